use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load in order and returns the output path.
    /// The first failing phase aborts the run.
    pub fn run(&self) -> Result<String> {
        tracing::info!("Starting ETL process");

        tracing::debug!("Extracting data");
        let raw_data = self.pipeline.extract()?;
        tracing::info!("Extracted {} records", raw_data.len());

        tracing::debug!("Transforming data");
        let transformed = self.pipeline.transform(raw_data)?;
        tracing::info!("Transformed {} records", transformed.records.len());
        if !transformed.passthrough_columns.is_empty() {
            tracing::info!(
                "Passed through unmapped columns: {}",
                transformed.passthrough_columns.join(", ")
            );
        }

        tracing::debug!("Loading data");
        let output_path = self.pipeline.load(transformed)?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(output_path)
    }
}
