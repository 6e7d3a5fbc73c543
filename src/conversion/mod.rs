/*!
 * PDF-to-Markdown conversion.
 *
 * Conversion is consumed as a black box: an external converter command is
 * invoked with the PDF path as its final argument and must write Markdown
 * to stdout. This module wraps that contract, adds the page count read
 * from the PDF itself, and optionally re-wraps long lines in the produced
 * Markdown.
 */

use async_trait::async_trait;
use log::{info, warn};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

use crate::app_config::ConversionConfig;
use crate::chunking::page;
use crate::errors::{AppError, ConversionError, InputError};
use crate::file_utils::FileManager;

/// Result of converting one PDF.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// The produced Markdown text
    pub markdown: String,
    /// Page count of the source PDF
    pub page_count: usize,
}

/// Converter capability consumed by the pipeline.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Convert one PDF file to Markdown.
    async fn convert(&self, pdf: &Path) -> Result<ConversionOutput, AppError>;
}

/// Converter backed by an external command.
pub struct CommandConverter {
    command: String,
    args: Vec<String>,
    timeout_secs: u64,
    line_width: Option<usize>,
}

impl CommandConverter {
    /// Build a converter from the application configuration.
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self {
            command: config.command.clone(),
            args: config.args.clone(),
            timeout_secs: config.timeout_secs,
            line_width: config.wrap_lines.then_some(config.line_width),
        }
    }
}

#[async_trait]
impl Converter for CommandConverter {
    async fn convert(&self, pdf: &Path) -> Result<ConversionOutput, AppError> {
        if !FileManager::file_exists(pdf) {
            return Err(InputError::NotFound(pdf.to_path_buf()).into());
        }

        let page_count = page::page_count(pdf).await?;

        let mut command = Command::new(&self.command);
        command
            .args(&self.args)
            .arg(pdf)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let output = timeout(Duration::from_secs(self.timeout_secs), command.output())
            .await
            .map_err(|_| ConversionError::Timeout {
                command: self.command.clone(),
                secs: self.timeout_secs,
            })?
            .map_err(|e| ConversionError::CommandFailed {
                command: self.command.clone(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ConversionError::CommandFailed {
                command: self.command.clone(),
                detail: stderr.trim().to_string(),
            }
            .into());
        }

        let mut markdown = String::from_utf8_lossy(&output.stdout).to_string();
        if markdown.trim().is_empty() {
            return Err(ConversionError::EmptyOutput(pdf.to_path_buf()).into());
        }

        if let Some(width) = self.line_width {
            markdown = wrap_markdown(&markdown, width);
        }

        Ok(ConversionOutput {
            markdown,
            page_count,
        })
    }
}

/// Convert every PDF in a directory to a sibling `.md` file.
///
/// PDFs that already have a sibling Markdown file are skipped; a failed
/// conversion is reported and the batch continues. Returns
/// `(converted, skipped, failed)` counts.
pub async fn convert_directory(
    converter: &dyn Converter,
    dir: &Path,
) -> Result<(usize, usize, usize), AppError> {
    let pdf_files = FileManager::find_files(dir, "pdf").map_err(|e| AppError::File(e.to_string()))?;

    if pdf_files.is_empty() {
        warn!("No PDF files found in {:?}", dir);
        return Ok((0, 0, 0));
    }

    info!("Found {} PDF file(s) to convert in {:?}", pdf_files.len(), dir);

    let mut converted = 0;
    let mut skipped = 0;
    let mut failed = 0;

    for pdf in &pdf_files {
        let output_path = pdf.with_extension("md");
        if FileManager::file_exists(&output_path) {
            info!("Skipping {:?}, Markdown already exists", pdf);
            skipped += 1;
            continue;
        }

        match converter.convert(pdf).await {
            Ok(output) => {
                if let Err(e) = FileManager::write_to_file(&output_path, &output.markdown) {
                    warn!("Failed to write {:?}: {}", output_path, e);
                    failed += 1;
                    continue;
                }
                info!(
                    "Converted {:?} -> {:?} ({} pages)",
                    pdf, output_path, output.page_count
                );
                converted += 1;
            }
            Err(e) => {
                warn!("Failed to convert {:?}: {}", pdf, e);
                failed += 1;
            }
        }
    }

    Ok((converted, skipped, failed))
}

/// Wrap Markdown lines to a maximum width while preserving structure.
///
/// Blank lines, headings, code fences, and table rows are never wrapped.
pub fn wrap_markdown(content: &str, width: usize) -> String {
    let mut wrapped_lines: Vec<String> = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with("```")
            || trimmed.starts_with('|')
            || line.chars().count() <= width
        {
            wrapped_lines.push(line.to_string());
        } else {
            wrapped_lines.extend(wrap_line(line, width));
        }
    }

    wrapped_lines.join("\n")
}

/// Greedy word wrap of a single line; words longer than the width stay whole.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split_whitespace() {
        let word_width = word.chars().count();
        if current_width > 0 && current_width + 1 + word_width > width {
            result.push(std::mem::take(&mut current));
            current_width = 0;
        }
        if current_width > 0 {
            current.push(' ');
            current_width += 1;
        }
        current.push_str(word);
        current_width += word_width;
    }
    if !current.is_empty() {
        result.push(current);
    }

    result
}
