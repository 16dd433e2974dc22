use clap::Parser;
use iossim_rs::lab::Lab;
use iossim_rs::sim::SimTime;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "iossim", about = "运行一个 JSON 描述的 IOS 网络实验并打印 CLI 记录")]
struct Args {
    /// 实验描述文件
    #[arg(long)]
    lab: PathBuf,

    /// 步骤执行完后把虚拟时钟推进到多少毫秒
    #[arg(long)]
    until_ms: Option<u64>,

    /// 把结果（命令记录、设备运行配置）写成 JSON
    #[arg(long)]
    json_out: Option<PathBuf>,
}

fn main() -> ExitCode {
    // 初始化 tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut lab = match Lab::load(&args.lab) {
        Ok(lab) => lab,
        Err(e) => {
            eprintln!("failed to load {}: {e}", args.lab.display());
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = lab.run(args.until_ms.map(SimTime::from_millis)) {
        eprintln!("lab failed: {e}");
        return ExitCode::FAILURE;
    }

    for entry in lab.transcript() {
        println!("{}{}", entry.prompt, entry.command);
        if !entry.output.is_empty() {
            println!("{}", entry.output);
        }
    }
    println!("done @ {}", lab.now());

    if let Some(path) = &args.json_out {
        let report = lab.report();
        let written = serde_json::to_string_pretty(&report)
            .map_err(|e| e.to_string())
            .and_then(|raw| fs::write(path, raw).map_err(|e| e.to_string()));
        if let Err(e) = written {
            eprintln!("failed to write {}: {e}", path.display());
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
