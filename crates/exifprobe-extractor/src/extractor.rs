//! Extraction orchestrator and directory walker

use crate::basic::{basic_file_info, file_name};
use crate::config::ExtractorConfig;
use crate::fast::ExifParser;
use crate::tool::ExifTool;
use exifprobe_domain::traits::{MetadataParser, MetadataTool, ToolConfig};
use exifprobe_domain::{
    Classification, ExtractionOutcome, FallbackReason, FileResult, LabelDictionary,
    MetadataRecord, Strategy,
};
use exifprobe_gatekeeper::{Target, TargetKind};
use std::fmt::Display;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Error recorded for directory entries with an unsupported extension
pub const UNSUPPORTED_FORMAT: &str = "Not a supported image format";

/// Error recorded for directory entries that are not regular files
pub const NOT_A_REGULAR_FILE: &str = "Not a regular file";

/// The production pipeline: kamadak-exif fast path, `exiftool` fallback
pub type DefaultExtractor = Extractor<ExifParser, ExifTool>;

/// The Extractor turns a path into canonical metadata records
///
/// Standard images go through the fast parser first and fall back to the
/// external tool when it fails; RAW files go straight to the tool. Nothing
/// here returns an error: every failure is folded into the trailing
/// `ExtractionStatus` record or a failed [`FileResult`].
pub struct Extractor<P, T> {
    parser: Arc<P>,
    tool: T,
    labels: Arc<LabelDictionary>,
    config: ExtractorConfig,
}

impl DefaultExtractor {
    /// Build the production pipeline from configuration
    pub fn from_config(config: ExtractorConfig) -> Self {
        let labels = LabelDictionary::standard();
        let parser = ExifParser::new(Arc::clone(&labels), config.blob_limit);
        let tool = ExifTool::new(
            Arc::clone(&labels),
            config.default_executable.clone(),
            config.tool_timeout(),
        );
        Self::new(parser, tool, labels, config)
    }
}

impl<P, T> Extractor<P, T>
where
    P: MetadataParser + Send + Sync + 'static,
    P::Error: Display,
    T: MetadataTool + Sync,
    T::Error: Display,
{
    /// Create a new Extractor
    pub fn new(parser: P, tool: T, labels: Arc<LabelDictionary>, config: ExtractorConfig) -> Self {
        Self {
            parser: Arc::new(parser),
            tool,
            labels,
            config,
        }
    }

    /// Configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The fast-path parser
    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// The external tool adapter
    pub fn tool(&self) -> &T {
        &self.tool
    }

    /// Extract one file into its canonical record list
    ///
    /// The list always ends with exactly one `ExtractionStatus` record.
    pub async fn extract(&self, path: &Path, tool_config: &ToolConfig) -> Vec<MetadataRecord> {
        self.extract_outcome(path, tool_config).await.into_records()
    }

    /// Extract one file, keeping the outcome tagged
    pub async fn extract_outcome(&self, path: &Path, tool_config: &ToolConfig) -> ExtractionOutcome {
        let classification = Classification::of(path);
        debug!("Extracting {} ({})", path.display(), classification.as_str());

        if classification != Classification::RawFormat {
            match self.fast_parse(path).await {
                Ok(records) if records.is_empty() => {
                    return self
                        .fallback(path, Strategy::FastParser, FallbackReason::Empty)
                        .await;
                }
                Ok(records) => return ExtractionOutcome::FastParsed(records),
                Err(message) => {
                    warn!(
                        "exif-parser extraction failed for {}, falling back to exiftool: {}",
                        path.display(),
                        message
                    );
                }
            }
        }

        match self.tool.run(path, tool_config.executable()).await {
            Ok(records) if records.is_empty() => {
                self.fallback(path, Strategy::ExternalTool, FallbackReason::Empty)
                    .await
            }
            Ok(records) => ExtractionOutcome::ToolParsed(records),
            Err(e) => {
                warn!("exiftool extraction failed for {}: {}", path.display(), e);
                self.fallback(
                    path,
                    Strategy::ExternalTool,
                    FallbackReason::Failed(e.to_string()),
                )
                .await
            }
        }
    }

    /// Extract one file behind the classification gate
    pub async fn process_file(&self, path: &Path, tool_config: &ToolConfig) -> FileResult {
        let name = file_name(path);
        if !Classification::of(path).is_supported() {
            debug!("Skipping {}: unsupported extension", path.display());
            return FileResult::failed(name, UNSUPPORTED_FORMAT);
        }
        FileResult::processed(name, self.extract(path, tool_config).await)
    }

    /// Extract every entry of a directory, non-recursively
    ///
    /// Entries are processed one at a time in listing order. A directory that
    /// cannot be read yields a single failed result named after it.
    pub async fn walk_directory(&self, dir: &Path, tool_config: &ToolConfig) -> Vec<FileResult> {
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to read directory {}: {}", dir.display(), e);
                return vec![FileResult::failed(file_name(dir), e.to_string())];
            }
        };

        let mut results = Vec::new();
        loop {
            match entries.next_entry().await {
                Ok(Some(entry)) => {
                    results.push(self.walk_entry(&entry.path(), tool_config).await);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!("Directory listing of {} interrupted: {}", dir.display(), e);
                    results.push(FileResult::failed(file_name(dir), e.to_string()));
                    break;
                }
            }
        }

        info!(
            "Processed {} of {} entries in {}",
            results.iter().filter(|r| r.success).count(),
            results.len(),
            dir.display()
        );
        results
    }

    /// Run a validated target: one result for a file, one per entry for a directory
    pub async fn query(&self, target: &Target, tool_config: &ToolConfig) -> Vec<FileResult> {
        match target.kind {
            TargetKind::File => vec![self.process_file(&target.path, tool_config).await],
            TargetKind::Directory => self.walk_directory(&target.path, tool_config).await,
        }
    }

    async fn walk_entry(&self, path: &Path, tool_config: &ToolConfig) -> FileResult {
        match tokio::fs::metadata(path).await {
            Ok(metadata) if metadata.is_file() => self.process_file(path, tool_config).await,
            Ok(_) => FileResult::failed(file_name(path), NOT_A_REGULAR_FILE),
            Err(e) => {
                warn!("Failed to stat {}: {}", path.display(), e);
                FileResult::failed(file_name(path), e.to_string())
            }
        }
    }

    async fn fast_parse(&self, path: &Path) -> Result<Vec<MetadataRecord>, String> {
        let bytes = tokio::fs::read(path).await.map_err(|e| e.to_string())?;
        let parser = Arc::clone(&self.parser);

        tokio::task::spawn_blocking(move || parser.parse(&bytes).map_err(|e| e.to_string()))
            .await
            .map_err(|e| format!("Task join error: {}", e))?
    }

    async fn fallback(
        &self,
        path: &Path,
        strategy: Strategy,
        reason: FallbackReason,
    ) -> ExtractionOutcome {
        let basic = basic_file_info(path, &self.labels)
            .await
            .unwrap_or_else(|e| {
                warn!("Failed to get basic file info for {}: {}", path.display(), e);
                Vec::new()
            });

        ExtractionOutcome::Fallback {
            basic,
            strategy,
            reason,
        }
    }
}
