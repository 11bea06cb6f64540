use std::path::{Path, PathBuf};

/// Extension of every alignment artifact the pipeline produces or consumes.
pub const ALIGNMENT_EXT: &str = "afa";

/// Extension of a raw Stockholm download before conversion.
pub const STOCKHOLM_EXT: &str = "sto";

/// One derived form of a family's alignment.
///
/// Every stage that writes or reads an alignment artifact goes through
/// [`alignment_path`] with one of these, so the naming convention lives in
/// exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// The curated seed alignment fetched for an accession
    Seed,
    /// The full alignment fetched for an accession
    Full,
    /// Redundancy-reduced at a maximum pairwise identity (percent)
    Identity(u32),
    /// Homology-enriched by the profile search
    Enriched,
    /// The single converted input in --msa-file mode; carries no suffix
    Base,
}

impl Variant {
    fn suffix(&self) -> Option<String> {
        match self {
            Variant::Seed => Some("seed".to_string()),
            Variant::Full => Some("full".to_string()),
            Variant::Identity(threshold) => Some(threshold.to_string()),
            Variant::Enriched => Some("enriched".to_string()),
            Variant::Base => None,
        }
    }
}

/// Produce the file stem for a family/variant pair, e.g. `PF00001_seed`.
pub fn artifact_stem(family: &str, variant: Variant) -> String {
    match variant.suffix() {
        Some(suffix) => format!("{family}_{suffix}"),
        None => family.to_string(),
    }
}

/// Produce the path of a converted alignment artifact.
pub fn alignment_path(out_dir: &Path, family: &str, variant: Variant) -> PathBuf {
    out_dir.join(format!(
        "{}.{ALIGNMENT_EXT}",
        artifact_stem(family, variant)
    ))
}

/// Produce the path of a raw Stockholm download.
///
/// These exist only between the fetch and convert steps of the acquire
/// stage; the driver removes them after their one-time conversion.
pub fn stockholm_path(out_dir: &Path, family: &str, variant: Variant) -> PathBuf {
    out_dir.join(format!(
        "{}.{STOCKHOLM_EXT}",
        artifact_stem(family, variant)
    ))
}

/// Produce the file-name prefix handed to the clustering tool.
///
/// The clusterer appends `_cluster_{n}.afa`, which keeps its outputs inside
/// the `{family}*.afa` set the HMM generator discovers.
pub fn cluster_prefix(family: &str, variant: Variant) -> String {
    artifact_stem(family, variant)
}

/// Produce the path of the run manifest written after the final stage.
pub fn manifest_path(out_dir: &Path, family: &str) -> PathBuf {
    out_dir.join(format!("{family}_run.json"))
}

/// Whether a file name belongs to the family's alignment artifact set.
///
/// This is the consumer side of the naming convention: the HMM generator
/// feeds every matching file, in sorted order, to the model builder.
pub fn is_family_alignment(file_name: &str, family: &str) -> bool {
    file_name.starts_with(family) && file_name.ends_with(&format!(".{ALIGNMENT_EXT}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_stems() {
        assert_eq!(artifact_stem("PF00001", Variant::Seed), "PF00001_seed");
        assert_eq!(artifact_stem("PF00001", Variant::Full), "PF00001_full");
        assert_eq!(artifact_stem("PF00001", Variant::Identity(90)), "PF00001_90");
        assert_eq!(artifact_stem("PF00001", Variant::Identity(50)), "PF00001_50");
        assert_eq!(
            artifact_stem("PF00001", Variant::Enriched),
            "PF00001_enriched"
        );
        assert_eq!(artifact_stem("my_msa", Variant::Base), "my_msa");
    }

    #[test]
    fn alignment_paths_carry_the_afa_extension() {
        let path = alignment_path(Path::new("out"), "PF00001", Variant::Identity(50));
        assert_eq!(path, PathBuf::from("out/PF00001_50.afa"));

        let path = alignment_path(Path::new("out"), "my_msa", Variant::Base);
        assert_eq!(path, PathBuf::from("out/my_msa.afa"));
    }

    #[test]
    fn stockholm_paths_carry_the_sto_extension() {
        let path = stockholm_path(Path::new("out"), "PF00001", Variant::Seed);
        assert_eq!(path, PathBuf::from("out/PF00001_seed.sto"));
    }

    #[test]
    fn family_alignment_membership() {
        assert!(is_family_alignment("PF00001_seed.afa", "PF00001"));
        assert!(is_family_alignment("PF00001_full_cluster_3.afa", "PF00001"));
        assert!(is_family_alignment("PF00001.afa", "PF00001"));
        assert!(!is_family_alignment("PF00001_seed.sto", "PF00001"));
        assert!(!is_family_alignment("PF00002_seed.afa", "PF00001"));
        assert!(!is_family_alignment("PF00001_run.json", "PF00001"));
    }

    #[test]
    fn dotted_family_names_survive() {
        // a --msa-file stem like "family.v2" must not lose its dot
        let path = alignment_path(Path::new("out"), "family.v2", Variant::Base);
        assert_eq!(path, PathBuf::from("out/family.v2.afa"));
    }
}
