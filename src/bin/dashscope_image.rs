//! dashscope-image — 提交图像生成任务、查询任务状态的命令行工具
//!
//! Usage:
//!   dashscope-image submit --model <m> --prompt <p> [options]   Submit a synthesis task
//!   dashscope-image status <task_id>                           Show a task's current state
//!   dashscope-image route <model>                              Show which endpoint serves a model
//!   dashscope-image models                                     List known models

use anyhow::{bail, Context};
use dashscope_image::{models, ImageApiBuilder, ImageParameters, ImageRequest, RoutingClass};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        std::process::exit(1);
    }

    match args[1].as_str() {
        "submit" => cmd_submit(&args[2..]).await,
        "status" => cmd_status(&args[2..]).await,
        "route" => cmd_route(&args[2..]),
        "models" => {
            cmd_models();
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("dashscope-image {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!(
        r#"dashscope-image — DashScope 图像生成命令行工具

USAGE:
    dashscope-image <COMMAND> [OPTIONS]

COMMANDS:
    submit --model <m> --prompt <p>   Submit a synthesis task
        [--negative-prompt <text>] [--function <name>]
        [--base-image-url <url>] [--mask-image-url <url>]
        [--sketch-image-url <url>] [--size <w*h>] [--n <count>]
    status <task_id>                  Show a task's current state
    route <model>                     Show which endpoint serves a model
    models                            List known models
    version                           Show version information
    help                              Show this help message

ENVIRONMENT:
    DASHSCOPE_API_KEY                 API key (required for submit/status)
    DASHSCOPE_BASE_URL                Service base URL
    DASHSCOPE_WORKSPACE_ID            Workspace id
    RUST_LOG                          Log filter (e.g. dashscope_image=debug)"#
    );
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

async fn cmd_submit(args: &[String]) -> anyhow::Result<()> {
    let model = flag(args, "--model").unwrap_or(models::DEFAULT_IMAGE_MODEL);
    let Some(prompt) = flag(args, "--prompt") else {
        bail!("--prompt is required");
    };

    let mut request = ImageRequest::new(model, prompt);
    if let Some(v) = flag(args, "--negative-prompt") {
        request = request.with_negative_prompt(v);
    }
    if let Some(v) = flag(args, "--function") {
        request = request.with_function(v);
    }
    if let Some(v) = flag(args, "--base-image-url") {
        request = request.with_base_image_url(v);
    }
    if let Some(v) = flag(args, "--mask-image-url") {
        request = request.with_mask_image_url(v);
    }
    if let Some(v) = flag(args, "--sketch-image-url") {
        request = request.with_sketch_image_url(v);
    }

    let mut params = ImageParameters::default();
    if let Some(size) = flag(args, "--size") {
        params.size = Some(size.to_string());
    }
    if let Some(n) = flag(args, "--n") {
        params.n = Some(n.parse().with_context(|| format!("invalid --n value '{n}'"))?);
    }
    if params != ImageParameters::default() {
        request = request.with_parameters(params);
    }

    let api = ImageApiBuilder::from_env()?.build()?;
    let response = api.submit_image_gen_task(request).await?;
    println!("HTTP {}", response.status());
    println!("{}", serde_json::to_string_pretty(&response.body())?);
    Ok(())
}

async fn cmd_status(args: &[String]) -> anyhow::Result<()> {
    let Some(task_id) = args.first() else {
        bail!("usage: dashscope-image status <task_id>");
    };
    let api = ImageApiBuilder::from_env()?.build()?;
    let response = api.get_image_gen_task_result(task_id).await?;
    println!("HTTP {}", response.status());
    println!("{}", serde_json::to_string_pretty(&response.body())?);
    Ok(())
}

fn cmd_route(args: &[String]) -> anyhow::Result<()> {
    let Some(model) = args.first() else {
        bail!("usage: dashscope-image route <model>");
    };
    let class = RoutingClass::classify(model);
    println!("{}", class.submit_path());
    if !models::is_known_model(model) {
        eprintln!("note: '{model}' is not a known model; defaulted to {class}");
    }
    Ok(())
}

fn cmd_models() {
    println!("text2image:");
    for m in models::TEXT_TO_IMAGE_MODELS {
        println!("  {m}");
    }
    println!("image2image:");
    for m in models::IMAGE_TO_IMAGE_MODELS {
        println!("  {m}");
    }
}
