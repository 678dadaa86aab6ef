//! Merge `.docx` files from the command line.
//!
//! ```text
//! cargo run --example merge_docx -- a.docx b.docx -o merged.docx
//! ```

use std::path::PathBuf;

use clap::Parser;
use docx_merge::{MergeOptions, merge_files};

/// Merge Word documents into one, in the given order.
#[derive(Debug, Clone, Parser)]
struct Args {
    /// Input documents; the first one provides page setup and headers
    #[clap(value_name = "INPUT", required = true)]
    inputs: Vec<PathBuf>,

    /// Path to the merged document
    #[clap(short, long, value_name = "OUTPUT", default_value = "merged.docx")]
    output: PathBuf,

    /// Do not insert a page break between documents
    #[clap(long)]
    no_page_break: bool,

    /// YAML file with merge options
    #[clap(long, value_name = "CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::builder()
        .filter_module("docx_merge", log::LevelFilter::Info)
        .parse_default_env()
        .try_init()?;

    let mut options = match &args.config {
        Some(path) => MergeOptions::from_yaml_str(&tokio::fs::read_to_string(path).await?)?,
        None => MergeOptions::default(),
    };
    if args.no_page_break {
        options = options.with_page_break(false);
    }

    match merge_files(&args.inputs, options).await? {
        Some(bytes) => {
            tokio::fs::write(&args.output, &bytes).await?;
            log::info!("Wrote {} ({} bytes)", args.output.display(), bytes.len());
        },
        None => eprintln!("nothing to merge"),
    }
    Ok(())
}
