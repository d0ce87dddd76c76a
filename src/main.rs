use clap::Parser;
use prereq_graph::domain::ports::{CatalogSource, ConfigProvider};
use prereq_graph::utils::error::ErrorSeverity;
use prereq_graph::utils::{logger, validation::Validate};
use prereq_graph::{
    CliArgs, LocalStorage, PrereqEngine, PrereqError, PrereqPipeline, RandomColors, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_cli_logger(args.verbose, args.json_logs || config.json_logs());

    tracing::info!("🚀 Starting prereq-graph");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    args.apply_overrides(&mut config);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let source = config.catalog_source()?;
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = PrereqPipeline::new(storage, config, source, RandomColors::new());
    let engine = PrereqEngine::new(pipeline);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No files will be written");
        match engine.analyze().await {
            Ok(result) => {
                println!("🔍 Dry Run Analysis:");
                for institution in &result.institutions {
                    println!(
                        "  [{}] {} courses, {} edges, {} phantom nodes, {} departments",
                        institution.institution,
                        institution.catalog.len(),
                        institution.edges.len(),
                        institution.phantom_count,
                        institution.documents.len()
                    );
                    for (code, line) in &institution.unmatched {
                        println!("    ⚠️ {}: {}", code, line);
                    }
                }
                return Ok(());
            }
            Err(e) => exit_with(e),
        }
    }

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Export completed successfully!");
            println!("✅ Export completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

fn exit_with(e: PrereqError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Export failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

fn display_config_summary(config: &TomlConfig, args: &CliArgs) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    if let Ok(source) = config.catalog_source() {
        println!("  Source: {}", source.describe());
    }
    println!("  Output: {}", config.output_path());
    println!("  Requisite mode: {:?}", config.requisite_mode());
    println!("  Number rule: {:?}", config.number_rule());
    println!("  Deduplicate edges: {}", config.deduplicate_edges());
    println!("  Layout iterations: {}", config.max_iterations());
    if let Some(template) = config.template_dir() {
        println!("  Template: {}", template);
    }
    if !config.institutions().is_empty() {
        println!("  Institutions: {}", config.institutions().join(", "));
    }
    if !config.departments().is_empty() {
        println!("  Departments: {}", config.departments().join(", "));
    }
    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }
    println!();
}
