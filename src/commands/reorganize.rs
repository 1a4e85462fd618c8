//! Reorganize command - lay out a board's images in a grid and save a copy.

use std::path::Path;

use log::{debug, info};

use crate::board::{BoardReader, BoardWriter, PurCodec};
use crate::error_fmt::{AppError, IoResultExt, ParseResultExt, SerializeResultExt};
use crate::grid::{self, GridSummary};
use crate::settings::Settings;

#[derive(Debug, Clone, Default)]
pub struct ReorganizeOptions {
    pub settings: Settings,
    /// Run the transform and report, but leave the output path untouched.
    pub dry_run: bool,
}

/// Reorganize `input` into `output` using the `.pur` codec.
pub fn reorganize(
    input: &Path,
    output: &Path,
    options: &ReorganizeOptions,
) -> Result<GridSummary, AppError> {
    reorganize_with(&PurCodec, input, output, options)
}

/// Reorganize `input` into `output` with the given codec.
///
/// The output file is only written once the whole board has been
/// transformed and encoded, so a failure never leaves a partial file.
pub fn reorganize_with<C>(
    codec: &C,
    input: &Path,
    output: &Path,
    options: &ReorganizeOptions,
) -> Result<GridSummary, AppError>
where
    C: BoardReader + BoardWriter,
{
    let input_str = input.display().to_string();
    let output_str = output.display().to_string();

    if !input.exists() {
        return Err(AppError::InputNotFound(input_str));
    }

    let bytes = std::fs::read(input).with_context(&format!("failed to read {}", input_str))?;
    debug!("read {} bytes from {}", bytes.len(), input_str);

    let mut board = codec.read(&bytes).with_path(&input_str)?;

    let summary =
        grid::reorganize(&mut board, options.settings.padding).ok_or(AppError::EmptyBoard)?;

    let encoded = codec.write(&board).with_path(&output_str)?;

    if options.dry_run {
        info!("dry run, not writing {}", output_str);
        println!(
            "Would reorganize {} images into a {}x{} grid ({} not written)",
            summary.images, summary.rows, summary.cols, output_str
        );
        return Ok(summary);
    }

    let context = format!("failed to write {}", output_str);
    std::fs::write(output, &encoded).with_context(&context)?;
    info!("wrote {} bytes to {}", encoded.len(), output_str);

    println!("{}", success_message(&summary));
    Ok(summary)
}

pub fn success_message(summary: &GridSummary) -> String {
    format!(
        "Successfully reorganized {} images into a {}x{} grid",
        summary.images, summary.rows, summary.cols
    )
}
