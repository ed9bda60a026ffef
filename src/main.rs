use anyhow::Context;
use clap::Parser;
use dpd_shipment::config::cli::Command;
use dpd_shipment::utils::{logger, validation::Validate};
use dpd_shipment::{CliConfig, ErrorKind, LabelMerger, ShipmentClient, ShipmentError};
use std::path::{Path, PathBuf};

const DEFAULT_MERGED_OUTPUT: &str = "labels.pdf";

fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting dpd-shipment CLI");

    if let Err(e) = run(&config) {
        tracing::error!("❌ Command failed: {:#}", e);
        eprintln!("❌ {:#}", e);

        // 依錯誤類型決定退出碼
        let exit_code = match e.downcast_ref::<ShipmentError>().map(ShipmentError::kind) {
            Some(ErrorKind::ApiRejected) => 2,
            Some(ErrorKind::Transport) => 3,
            Some(ErrorKind::Configuration) => 4,
            _ => 1,
        };
        if let Some(api_error) = e.downcast_ref::<ShipmentError>() {
            for message in api_error.error_messages() {
                eprintln!("  - {}", message);
            }
        }
        std::process::exit(exit_code);
    }
}

fn run(config: &CliConfig) -> anyhow::Result<()> {
    match &config.command {
        Command::Send { payload } => {
            let client = build_client(config)?;
            let content = std::fs::read_to_string(payload)
                .with_context(|| format!("reading shipment payload {}", payload.display()))?;
            let shipment: serde_json::Value =
                serde_json::from_str(&content).context("shipment payload is not valid JSON")?;

            let result = client.send(&shipment)?;
            if let Some(label) = result.label() {
                println!("🏷️ Label: {}", label);
            }
            println!("{}", serde_json::to_string_pretty(&result.record.data)?);
        }
        Command::Parcelshops => {
            let client = build_client(config)?;
            let parcelshops = client.get_parcelshops()?;
            let records: Vec<_> = parcelshops.iter().map(|p| &p.data).collect();
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Label { url, output } => {
            let settings = config.label_settings()?;
            let merger = LabelMerger::new(&settings.options)?;
            let label = merger.fetch_label(url)?;
            write_output(output, &label.bytes)?;
            println!("📁 Label saved to: {}", output.display());
        }
        Command::MergeLabels { sources, output } => {
            let settings = config.label_settings()?;
            let output = output
                .clone()
                .or_else(|| settings.output_path.clone().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_MERGED_OUTPUT));

            let merger = LabelMerger::new(&settings.options)?;
            let merged = merger.merge_labels(sources)?;
            write_output(&output, &merged.bytes)?;

            println!(
                "✅ Merged {} labels ({} pages) into {}",
                merged.merged_sources.len(),
                merged.page_count,
                output.display()
            );
            for skipped in &merged.skipped {
                println!("⚠️ Skipped: {}", skipped);
            }
        }
    }

    Ok(())
}

fn build_client(config: &CliConfig) -> anyhow::Result<ShipmentClient> {
    let settings = config.resolve()?;
    settings.validate()?;
    if config.verbose {
        tracing::debug!("Resolved settings: {:?}", settings);
    }

    let client = ShipmentClient::with_transport(
        settings.credentials,
        settings.options,
        dpd_shipment::HttpTransport::new()?,
    )?;
    Ok(client)
}

fn write_output(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
