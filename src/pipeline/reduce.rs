use std::path::Path;

use anyhow::Result;

use crate::pipeline::GAP_THRESHOLD;
use crate::proc::{PipeChain, ProcessSpec};

/// Minimum coverage with the query (%) a sequence must keep to survive
/// filtering; also the coverage used by the profile search.
pub const COVERAGE_FLOOR: u32 = 75;

/// Sequences shorter than this many residues are dropped.
pub const MIN_SEQ_LENGTH: u32 = 50;

fn identity_filter_spec(identity_threshold: u32) -> ProcessSpec {
    ProcessSpec::new("hhfilter")
        .args(["-v", "0"])
        .args(["-i", "stdin"])
        .args(["-o", "stdout"])
        // -id  [0,100]  maximum pairwise sequence identity (%)
        .args(["-id", &identity_threshold.to_string()])
        // -cov [0,100]  minimum coverage with query (%)
        .args(["-cov", &COVERAGE_FLOOR.to_string()])
}

/// The polish tail shared with the enrichment runner: reformat to aligned
/// fasta, drop gappy columns, uppercase and length-filter, de-duplicate.
pub fn polish_specs() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new("reformat.pl").args(["a3m", "fas", "stdin", "stdout"]),
        ProcessSpec::new("esl-alimask")
            .arg("--amino")
            .arg("-g")
            .args(["--gapthresh", &GAP_THRESHOLD.to_string()])
            .arg("-"),
        ProcessSpec::new("seqkit")
            .args(["seq", "-u"])
            .args(["-m", &MIN_SEQ_LENGTH.to_string()]),
        ProcessSpec::new("seqkit").args(["rmdup", "-s"]),
    ]
}

pub fn reduce_chain(identity_threshold: u32) -> PipeChain {
    let mut chain = PipeChain::new().then(identity_filter_spec(identity_threshold));
    for spec in polish_specs() {
        chain = chain.then(spec);
    }
    chain
}

/// Produce a non-redundant alignment at the given maximum pairwise
/// identity.
///
/// The whole transformation is one streaming chain; nothing touches disk
/// between the input and the output file, and the result is a pure
/// function of (input, threshold).
pub fn reduce(
    input: &Path,
    identity_threshold: u32,
    output: &Path,
    stream_stderr: bool,
) -> Result<()> {
    reduce_chain(identity_threshold).run(Some(input), output, stream_stderr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_chain_is_deterministic_for_a_threshold() {
        assert_eq!(
            reduce_chain(90).render(),
            "hhfilter -v 0 -i stdin -o stdout -id 90 -cov 75 \
             | reformat.pl a3m fas stdin stdout \
             | esl-alimask --amino -g --gapthresh 0.5 - \
             | seqkit seq -u -m 50 \
             | seqkit rmdup -s"
        );
        assert_eq!(reduce_chain(90).render(), reduce_chain(90).render());
    }

    #[test]
    fn chains_at_different_thresholds_differ_only_in_the_threshold() {
        let at_90 = reduce_chain(90).render();
        let at_50 = reduce_chain(50).render();
        assert_ne!(at_90, at_50);
        assert_eq!(at_90.replace("-id 90", "-id 50"), at_50);
    }

    #[test]
    fn the_polish_tail_ends_in_deduplication() {
        let specs = polish_specs();
        assert_eq!(specs.len(), 4);
        assert_eq!(specs.last().unwrap().render(), "seqkit rmdup -s");
    }
}
