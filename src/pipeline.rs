pub mod cluster;
pub mod convert;
pub mod enrich;
pub mod fetch;
pub mod hmm;
pub mod reduce;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use serde::Serialize;

use crate::args::{guess_alignment_format, Args, FileFormat};
use crate::extension_traits::PathBufExt;
use crate::naming::{self, Variant};
use crate::pipeline::fetch::AlignmentKind;

/// Maximum pairwise identity thresholds the reducer runs at, in stage order.
pub const IDENTITY_THRESHOLDS: [u32; 2] = [90, 50];

/// Gap fraction above which a column is dropped, shared by the polish tail
/// and the clusterer.
pub const GAP_THRESHOLD: f64 = 0.5;

/// One row of the pipeline: a named action gated by a predicate over the
/// run configuration.
///
/// The stage sequence is data, so gating is inspectable without executing
/// anything.
pub struct Stage {
    pub name: &'static str,
    pub enabled: fn(&Args) -> bool,
    pub run: fn(&Args) -> Result<()>,
}

pub fn stages() -> Vec<Stage> {
    vec![
        Stage {
            name: "prepare",
            enabled: |_| true,
            run: prepare_stage,
        },
        Stage {
            name: "acquire",
            enabled: |_| true,
            run: acquire_stage,
        },
        Stage {
            name: "reduce",
            enabled: |args| !args.file_mode(),
            run: reduce_stage,
        },
        Stage {
            name: "enrich",
            enabled: Args::enrichment_enabled,
            run: enrich_stage,
        },
        Stage {
            name: "cluster",
            enabled: Args::clustering_enabled,
            run: cluster_stage,
        },
        Stage {
            name: "hmm",
            enabled: |_| true,
            run: hmm_stage,
        },
    ]
}

/// Walk the stage table in order, fail-fast on the first stage error.
pub fn run(args: &Args) -> Result<()> {
    for stage in stages() {
        if !(stage.enabled)(args) {
            debug!("skipping {} stage", stage.name);
            continue;
        }
        info!("running {} stage", stage.name);
        (stage.run)(args).with_context(|| format!("{} stage failed", stage.name))?;
    }
    write_manifest(args)
}

fn prepare_stage(args: &Args) -> Result<()> {
    fs::create_dir_all(&args.out_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            args.out_dir.to_string_lossy()
        )
    })
}

/// Put the base alignment artifacts on disk: fetch + convert the remote
/// seed and full alignments in accession mode, or convert the supplied
/// file in --msa-file mode.
fn acquire_stage(args: &Args) -> Result<()> {
    match &args.msa_path {
        Some(msa_path) => {
            let format = guess_alignment_format(msa_path)?;
            convert::convert(
                msa_path,
                format,
                &naming::alignment_path(&args.out_dir, &args.family, Variant::Base),
                true,
            )
        }
        None => {
            for (kind, variant) in [
                (AlignmentKind::Seed, Variant::Seed),
                (AlignmentKind::Full, Variant::Full),
            ] {
                let stockholm = naming::stockholm_path(&args.out_dir, &args.family, variant);
                fetch::fetch_alignment(&args.family, kind, &stockholm)?;
                convert::convert(
                    &stockholm,
                    FileFormat::Stockholm,
                    &naming::alignment_path(&args.out_dir, &args.family, variant),
                    true,
                )?;
                // the raw download is only needed for this one conversion
                fs::remove_file(&stockholm).with_context(|| {
                    format!("failed to remove {}", stockholm.to_string_lossy())
                })?;
            }
            Ok(())
        }
    }
}

fn reduce_stage(args: &Args) -> Result<()> {
    let full = naming::alignment_path(&args.out_dir, &args.family, Variant::Full);
    for threshold in IDENTITY_THRESHOLDS {
        reduce::reduce(
            &full,
            threshold,
            &naming::alignment_path(&args.out_dir, &args.family, Variant::Identity(threshold)),
            args.stream_tool_output(),
        )?;
    }
    Ok(())
}

fn enrich_stage(args: &Args) -> Result<()> {
    let seed_variant = match args.file_mode() {
        // the supplied alignment plays the seed's role
        true => Variant::Base,
        false => Variant::Seed,
    };
    enrich::enrich(
        &naming::alignment_path(&args.out_dir, &args.family, seed_variant),
        &args.databases,
        &naming::alignment_path(&args.out_dir, &args.family, Variant::Enriched),
        args.stream_tool_output(),
    )
}

fn cluster_stage(args: &Args) -> Result<()> {
    for variant in cluster_variants(args) {
        cluster::cluster(
            &naming::alignment_path(&args.out_dir, &args.family, variant),
            &args.out_dir,
            &naming::cluster_prefix(&args.family, variant),
        )?;
    }
    Ok(())
}

/// The alignments handed to the clusterer: every non-enriched artifact.
pub fn cluster_variants(args: &Args) -> Vec<Variant> {
    match args.file_mode() {
        true => vec![Variant::Base],
        false => {
            let mut variants = vec![Variant::Seed, Variant::Full];
            variants.extend(IDENTITY_THRESHOLDS.map(Variant::Identity));
            variants
        }
    }
}

fn hmm_stage(args: &Args) -> Result<()> {
    hmm::generate(
        &args.hmm_path,
        &args.out_dir,
        &args.family,
        args.gathering_cutoff,
        args.ascii_hmm,
    )
}

#[derive(Serialize)]
struct RunManifest<'a> {
    family: &'a str,
    output_dir: &'a Path,
    hmm: &'a Path,
    alignments: Vec<PathBuf>,
}

/// A small summary of what the run produced, for whoever scripts around us.
fn write_manifest(args: &Args) -> Result<()> {
    let manifest = RunManifest {
        family: &args.family,
        output_dir: &args.out_dir,
        hmm: &args.hmm_path,
        alignments: hmm::discover_alignments(&args.out_dir, &args.family)?,
    };

    let mut writer = naming::manifest_path(&args.out_dir, &args.family).open(true)?;
    writeln!(writer, "{}", serde_json::to_string_pretty(&manifest)?)
        .context("failed to write run manifest")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_args(file_mode: bool, enrich: bool, cluster: bool) -> Args {
        Args {
            family: "PF00001".to_string(),
            msa_path: file_mode.then(|| PathBuf::from("msa.afa")),
            out_dir: PathBuf::from("out"),
            hmm_path: PathBuf::from("out.hmm"),
            databases: match enrich {
                true => vec![PathBuf::from("uniref30")],
                false => vec![],
            },
            disable_enrichment: !enrich,
            disable_clustering: (!cluster).then_some(1.0),
            ascii_hmm: false,
            gathering_cutoff: None,
            verbose: 0,
        }
    }

    fn enabled_names(args: &Args) -> Vec<&'static str> {
        stages()
            .iter()
            .filter(|stage| (stage.enabled)(args))
            .map(|stage| stage.name)
            .collect()
    }

    #[test]
    fn a_full_accession_run_enables_every_stage() {
        assert_eq!(
            enabled_names(&test_args(false, true, true)),
            ["prepare", "acquire", "reduce", "enrich", "cluster", "hmm"]
        );
    }

    #[test]
    fn flags_gate_enrichment_and_clustering_independently() {
        assert_eq!(
            enabled_names(&test_args(false, false, true)),
            ["prepare", "acquire", "reduce", "cluster", "hmm"]
        );
        assert_eq!(
            enabled_names(&test_args(false, true, false)),
            ["prepare", "acquire", "reduce", "enrich", "hmm"]
        );
        assert_eq!(
            enabled_names(&test_args(false, false, false)),
            ["prepare", "acquire", "reduce", "hmm"]
        );
    }

    #[test]
    fn file_mode_skips_redundancy_reduction() {
        assert_eq!(
            enabled_names(&test_args(true, true, true)),
            ["prepare", "acquire", "enrich", "cluster", "hmm"]
        );
    }

    #[test]
    fn cluster_targets_follow_the_mode() {
        assert_eq!(
            cluster_variants(&test_args(false, true, true)),
            [
                Variant::Seed,
                Variant::Full,
                Variant::Identity(90),
                Variant::Identity(50)
            ]
        );
        assert_eq!(cluster_variants(&test_args(true, true, true)), [Variant::Base]);
    }
}
