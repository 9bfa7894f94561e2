use crate::error::CfResult;
use crate::export::{ResultTable, TABLE_FILE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A downstream step that reads the stored result table and writes its own
/// artifacts next to it.
pub trait ResultConsumer: Send + Sync {
    fn name(&self) -> &str;
    fn consume(&self, table: &ResultTable, dir: &Path) -> CfResult<Vec<PathBuf>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerWarning {
    pub consumer: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct PublishReport {
    pub table_path: PathBuf,
    pub artifacts: Vec<PathBuf>,
    pub warnings: Vec<ConsumerWarning>,
}

/// Writes the table into `dir`, then hands it to every consumer.
///
/// Only a failure to store the table is fatal. Consumer failures are logged
/// and returned as warnings so one broken renderer does not lose the result.
pub fn publish(
    table: &ResultTable,
    dir: &Path,
    consumers: &[Box<dyn ResultConsumer>],
) -> CfResult<PublishReport> {
    fs::create_dir_all(dir)?;
    let table_path = dir.join(TABLE_FILE);
    table.write_csv(&table_path)?;
    info!("💾 Saved {} windings to {}", table.windings(), table_path.display());

    let mut report = PublishReport {
        table_path,
        ..Default::default()
    };

    if consumers.is_empty() {
        let message = "no result consumers registered; only the table was written".to_string();
        warn!("{}", message);
        report.warnings.push(ConsumerWarning {
            consumer: "publish".to_string(),
            message,
        });
        return Ok(report);
    }

    for consumer in consumers {
        match consumer.consume(table, dir) {
            Ok(paths) => report.artifacts.extend(paths),
            Err(e) => {
                warn!("⚠️  {} failed: {}", consumer.name(), e);
                report.warnings.push(ConsumerWarning {
                    consumer: consumer.name().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }
    Ok(report)
}
