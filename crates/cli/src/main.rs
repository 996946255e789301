#![deny(warnings)]

use anyhow::Context;
use clap::Parser;
use lingohub_core::config::{
    resolve_optional_string, system_user_lang, Preferences, StdEnv, DEFAULT_PREFERRED_LANGUAGE,
    DEFAULT_SOURCE, ENV_PREFERRED_LANGUAGE, ENV_SECOND_PREFERRED_LANGUAGE, ENV_SOURCE,
};
use lingohub_core::translate::{TranslateHub, TranslateRequest};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lingohub")]
#[command(about = "Translate a snippet of text via multiple web translation backends")]
struct Args {
    /// Text to translate.
    text: String,

    /// Source language code; omit to let the backend detect it.
    #[arg(long)]
    from: Option<String>,

    /// Target language code; omit to use the preferred language.
    #[arg(long)]
    to: Option<String>,

    #[arg(long, env = ENV_SOURCE, default_value = DEFAULT_SOURCE)]
    source: String,

    #[arg(long)]
    preferred_lang: Option<String>,

    #[arg(long)]
    second_preferred_lang: Option<String>,

    /// Also fetch pronunciation audio and print its data URI.
    #[arg(long, default_value_t = false)]
    audio: bool,

    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(&args.log_level)?;

    let env = StdEnv;
    let prefs = build_preferences(&args, &env)?;
    let source = args.source.clone();

    let hub = TranslateHub::builder()
        .user_lang(system_user_lang(&env))
        .default_sources()
        .build();

    let request = TranslateRequest {
        text: args.text.clone(),
        from: args.from.clone(),
        to: args.to.clone(),
        preferred_language: Some(prefs.preferred_language.clone()),
        second_preferred_language: Some(prefs.second_preferred_language.clone()),
        ..TranslateRequest::default()
    };

    tracing::info!(source = %source, "translating");
    let result = hub.translate(&source, request.clone()).await?;

    println!("[{} -> {}] {}", result.from, result.to, result.translations.join(" / "));
    if let Some(dict) = &result.dict {
        for line in dict {
            println!("dict: {line}");
        }
    }
    if let Some(example) = &result.example {
        for line in example {
            println!("example: {line}");
        }
    }

    if args.audio {
        let mut audio_request = request;
        // The audio path needs a concrete source language.
        audio_request.from = args.from.or(Some(result.from.clone()));
        match hub.audio(&source, audio_request, DEFAULT_SOURCE).await {
            Some(uri) => println!("audio: {uri}"),
            None => eprintln!("no audio available"),
        }
    }

    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            level
                .parse()
                .with_context(|| format!("invalid --log-level: {level}"))?,
        )
        .from_env_lossy();

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn build_preferences(
    args: &Args,
    env: &impl lingohub_core::config::Env,
) -> anyhow::Result<Preferences> {
    let preferred = resolve_optional_string(
        args.preferred_lang.clone(),
        ENV_PREFERRED_LANGUAGE,
        env,
    )
    .unwrap_or_else(|| DEFAULT_PREFERRED_LANGUAGE.to_owned());
    let second = resolve_optional_string(
        args.second_preferred_lang.clone(),
        ENV_SECOND_PREFERRED_LANGUAGE,
        env,
    )
    .unwrap_or_else(|| preferred.clone());

    Ok(Preferences::new(preferred, second)?)
}
