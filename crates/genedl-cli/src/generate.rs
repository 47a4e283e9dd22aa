//! One generator run: read, lay out, render, write

use anyhow::{Context, Result};
use genedl_core::{pipeline, PipelineOutput, Warning};
use genedl_edl::{summary_screen, FeatureScreen};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;

/// What to generate and where
#[derive(Debug, Clone)]
pub struct Job {
    pub xml_file: PathBuf,
    /// Output base name; the camera name is its last component
    pub edl_file: PathBuf,
    pub json_file: Option<PathBuf>,
    /// Overwrite an existing summary screen
    pub force_summary: bool,
}

/// Files produced by a run
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub warnings: Vec<Warning>,
}

impl Job {
    pub fn features_path(&self) -> PathBuf {
        with_suffix(&self.edl_file, "-features.edl")
    }

    pub fn summary_path(&self) -> PathBuf {
        with_suffix(&self.edl_file, ".edl")
    }

    pub fn camera_name(&self) -> String {
        self.edl_file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut s = OsString::from(base.as_os_str());
    s.push(suffix);
    PathBuf::from(s)
}

/// Run the whole generator. Nothing is written unless generation succeeds.
pub fn run(job: &Job, config: &Config) -> Result<Report> {
    let xml = std::fs::read_to_string(&job.xml_file)
        .with_context(|| format!("Failed to read {}", job.xml_file.display()))?;
    let pipeline_config = config.to_pipeline_config()?;
    let (tree, output) = pipeline::run_document(&xml, &pipeline_config).with_context(|| {
        format!("Failed to generate screens from {}", job.xml_file.display())
    })?;
    info!(path = %job.xml_file.display(), nodes = tree.len(), "Loaded GenICam description");

    let camera = job.camera_name();
    let features = FeatureScreen::new(&camera, &tree, &output, &config.style).render();

    let mut report = Report {
        warnings: output.warnings.clone(),
        ..Report::default()
    };

    let features_path = job.features_path();
    write(&features_path, &features)?;
    report.written.push(features_path);

    let summary_path = job.summary_path();
    if summary_path.exists() && !job.force_summary {
        info!(path = %summary_path.display(), "Summary screen exists, leaving it alone");
        report.skipped.push(summary_path);
    } else {
        write(&summary_path, &summary_screen(&camera, &config.style))?;
        report.written.push(summary_path);
    }

    if let Some(json_path) = &job.json_file {
        write_json(json_path, &output)?;
        report.written.push(json_path.clone());
    }

    if !report.warnings.is_empty() {
        warn!(count = report.warnings.len(), "Generated with warnings");
    }
    Ok(report)
}

fn write(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), bytes = content.len(), "Wrote screen");
    Ok(())
}

fn write_json(path: &Path, output: &PipelineOutput) -> Result<()> {
    let content = serde_json::to_string_pretty(output)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"cam-serial-0001
<?xml version="1.0"?>
<RegisterDescription ModelName="Cam">
    <Category Name="Root"><pFeature>Controls</pFeature></Category>
    <Category Name="Controls">
        <pFeature>ExposureTimeAbsoluteValue</pFeature>
        <pFeature>AcquisitionStart</pFeature>
    </Category>
    <Float Name="ExposureTimeAbsoluteValue"><AccessMode>RW</AccessMode></Float>
    <Command Name="AcquisitionStart"/>
    <IntReg><Address>0</Address></IntReg>
</RegisterDescription>"#;

    fn job(dir: &Path) -> Job {
        let xml_file = dir.join("cam.xml");
        std::fs::write(&xml_file, XML).unwrap();
        Job {
            xml_file,
            edl_file: dir.join("myCamera"),
            json_file: Some(dir.join("myCamera.json")),
            force_summary: false,
        }
    }

    #[test]
    fn test_paths() {
        let job = Job {
            xml_file: PathBuf::from("a.xml"),
            edl_file: PathBuf::from("opi/Prosilica_GC"),
            json_file: None,
            force_summary: false,
        };
        assert_eq!(job.features_path(), PathBuf::from("opi/Prosilica_GC-features.edl"));
        assert_eq!(job.summary_path(), PathBuf::from("opi/Prosilica_GC.edl"));
        assert_eq!(job.camera_name(), "Prosilica_GC");
    }

    #[test]
    fn test_run_writes_screens() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path());
        let report = run(&job, &Config::default()).unwrap();

        assert_eq!(report.written.len(), 3);
        assert_eq!(
            report.warnings,
            vec![Warning::UnnamedNode {
                element: "IntReg".into()
            }]
        );

        let features = std::fs::read_to_string(job.features_path()).unwrap();
        assert!(features.contains("title \"myCamera features - $(P)$(R)\""));
        assert!(features.contains("controlPv \"$(P)$(R)GC_ExpTimAbsValue\""));
        assert!(features.contains("controlPv \"$(P)$(R)GC_AcquisitionStart.PROC\""));

        let summary = std::fs::read_to_string(job.summary_path()).unwrap();
        assert!(summary.contains("\"myCamera-features\""));

        let json = std::fs::read_to_string(dir.path().join("myCamera.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(json["identifiers"]["AcquisitionStart"], "GC_AcquisitionStart");
    }

    #[test]
    fn test_existing_summary_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut job = job(dir.path());
        std::fs::write(job.summary_path(), "hand edited").unwrap();

        let report = run(&job, &Config::default()).unwrap();
        assert_eq!(report.skipped, vec![job.summary_path()]);
        assert_eq!(std::fs::read_to_string(job.summary_path()).unwrap(), "hand edited");

        job.force_summary = true;
        run(&job, &Config::default()).unwrap();
        assert_ne!(std::fs::read_to_string(job.summary_path()).unwrap(), "hand edited");
    }

    #[test]
    fn test_structural_error_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let job = job(dir.path());
        std::fs::write(
            &job.xml_file,
            r#"<RegisterDescription>
    <Category Name="Root"><pFeature>Gone</pFeature></Category>
</RegisterDescription>"#,
        )
        .unwrap();

        let err = run(&job, &Config::default()).unwrap_err();
        assert!(format!("{err:#}").contains("references unknown feature Gone"));
        assert!(!job.features_path().exists());
        assert!(!job.summary_path().exists());
    }
}
