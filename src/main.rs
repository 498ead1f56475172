use clap::Parser;
use job_tracker_etl::adapters::browser::launcher_for;
use job_tracker_etl::core::report;
use job_tracker_etl::core::{Pipeline, RunSummary};
use job_tracker_etl::utils::logger;
use job_tracker_etl::{
    CliConfig, DescriptionsPipeline, DetailsPipeline, EtlEngine, JobKind, LocalStorage, Result,
    Settings, XlsxWorkbook,
};
use std::path::Path;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.json_logs {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting job-tracker-etl {}", config.job().name());
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 合併並驗證配置
    let settings = match config.resolve() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if settings.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let result = match settings.job {
        JobKind::Details => run_details(&settings).await,
        JobKind::Descriptions => run_descriptions(&settings).await,
    };

    match result {
        Ok(Some(summary)) => {
            println!(
                "✅ {} finished: {} processed, {} ok, {} skipped, {} failed",
                summary.pipeline,
                summary.processed(),
                summary.succeeded(),
                summary.skipped(),
                summary.failed()
            );
        }
        Ok(None) => {}
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

async fn run_details(settings: &Settings) -> Result<Option<RunSummary>> {
    let workbook = XlsxWorkbook::open(&settings.workbook)?;
    let pipeline = DetailsPipeline::new(workbook, settings.layout.clone(), settings.pacer);
    execute(pipeline, settings).await
}

async fn run_descriptions(settings: &Settings) -> Result<Option<RunSummary>> {
    let workbook = XlsxWorkbook::open(&settings.workbook)?;
    let storage = LocalStorage::new(&settings.output_dir);
    let pipeline =
        DescriptionsPipeline::new(storage, workbook, settings.layout.clone(), settings.pacer);
    execute(pipeline, settings).await
}

async fn execute<P: Pipeline>(pipeline: P, settings: &Settings) -> Result<Option<RunSummary>> {
    let mut engine = EtlEngine::new_with_monitoring(pipeline, settings.pacer, settings.monitor)
        .with_limit(settings.limit);

    if settings.dry_run {
        let tasks = engine.plan().await?;
        println!("🔍 Dry run: {} rows would be processed", tasks.len());
        for task in &tasks {
            let (row, label) = engine.pipeline().describe(task);
            println!("  Row {}: {}", row, label);
        }
        return Ok(None);
    }

    let launcher = launcher_for(&settings.browser);
    let summary = engine.run(launcher.as_ref()).await?;

    if let Some(path) = &settings.report {
        report::write_csv(&summary, Path::new(path))?;
    }

    Ok(Some(summary))
}
