use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use nmt_engine::MarianNmtOnnx;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Translate a sentence with a local OPUS-MT ONNX export.
#[derive(Parser, Debug)]
struct Args {
    /// Directory with encoder_model.onnx, decoder_model.onnx, tokenizer.json
    #[arg(long, default_value = "models/nmt/opus-mt-ja-en")]
    model_dir: PathBuf,

    /// Text to translate (defaults to a Japanese sample sentence)
    #[arg(
        long,
        default_value = "「一つは人間として生まれ変わり、新たな人生を歩むか。そしてもう一つは、天国的な所でおじい爺ちゃんみたいな暮らしをするか」"
    )]
    text: String,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    tracing::info!("loading model from {}", args.model_dir.display());
    let translator = MarianNmtOnnx::new_from_dir(&args.model_dir)?;

    let translated = translator.translate(&args.text)?;
    println!("{translated}");

    Ok(())
}
