pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliArgs;

#[cfg(feature = "cli")]
pub mod cli {
    use super::toml_config::TomlConfig;
    use clap::Parser;

    #[derive(Debug, Clone, Parser)]
    #[command(name = "prereq-graph")]
    #[command(about = "Build course prerequisite networks for the web viewer")]
    pub struct CliArgs {
        /// Path to TOML configuration file
        #[arg(short, long, default_value = "prereq-graph.toml")]
        pub config: String,

        /// Enable verbose output
        #[arg(short, long)]
        pub verbose: bool,

        /// Emit logs as JSON lines
        #[arg(long)]
        pub json_logs: bool,

        /// Override the catalog dump(s) to read (switches the source to files)
        #[arg(long, value_delimiter = ',')]
        pub catalog: Vec<String>,

        /// Override the output directory
        #[arg(short, long)]
        pub output: Option<String>,

        /// Only export these institutions
        #[arg(long, value_delimiter = ',')]
        pub institution: Vec<String>,

        /// Only export these departments
        #[arg(long, value_delimiter = ',')]
        pub department: Vec<String>,

        /// Dry run - summarize the catalog and graph without writing files
        #[arg(long)]
        pub dry_run: bool,
    }

    impl CliArgs {
        /// 將命令列覆蓋設定套用到 TOML 配置
        pub fn apply_overrides(&self, config: &mut TomlConfig) {
            if !self.catalog.is_empty() {
                config.source.r#type = "file".to_string();
                config.source.paths = Some(self.catalog.clone());
                tracing::info!("🔧 Catalog overridden to: {}", self.catalog.join(", "));
            }
            if let Some(output) = &self.output {
                config.export.output_path = output.clone();
                tracing::info!("🔧 Output path overridden to: {}", output);
            }
            if !self.institution.is_empty() {
                config.extract.institutions = self.institution.clone();
            }
            if !self.department.is_empty() {
                config.extract.departments = self.department.clone();
            }
        }
    }

}
