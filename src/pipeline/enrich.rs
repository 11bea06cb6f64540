use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::pipeline::reduce::{polish_specs, COVERAGE_FLOOR};
use crate::proc::{PipeChain, ProcessSpec};

const SEARCH_IDENTITY: u32 = 90;
const SEARCH_MIN_PROBABILITY: u32 = 90;
const SEARCH_ITERATIONS: u32 = 3;
const SEARCH_EVALUE: &str = "1e-6";
const SEARCH_THREADS: u32 = 8;

fn profile_search_spec(input: &Path, databases: &[PathBuf]) -> ProcessSpec {
    let mut spec = ProcessSpec::new("hhblits")
        .arg("-i")
        .arg(input)
        // the enriched alignment is the product; the hit-list report is not
        .args(["-oa3m", "stdout"])
        .args(["-o", "/dev/null"])
        .args(["-v", "0"])
        .args(["-cpu", &SEARCH_THREADS.to_string()])
        // -n    [1,8]    number of iterations
        .args(["-n", &SEARCH_ITERATIONS.to_string()])
        // -e    [0,1]    E-value cutoff for inclusion in result alignment
        .args(["-e", SEARCH_EVALUE])
        .args(["-cov", &COVERAGE_FLOOR.to_string()])
        .args(["-id", &SEARCH_IDENTITY.to_string()])
        // -p    [0,100]  minimum probability in summary and alignment list
        .args(["-p", &SEARCH_MIN_PROBABILITY.to_string()]);
    for database in databases {
        spec = spec.arg("-d").arg(database);
    }
    spec
}

pub fn enrich_chain(input: &Path, databases: &[PathBuf]) -> PipeChain {
    let mut chain = PipeChain::new().then(profile_search_spec(input, databases));
    for spec in polish_specs() {
        chain = chain.then(spec);
    }
    chain
}

/// Enrich an alignment with homologs found across every database, then
/// polish the result the same way the redundancy reducer does.
///
/// The caller guarantees at least one database; the driver treats an empty
/// list as a usage error long before this runs.
pub fn enrich(
    input: &Path,
    databases: &[PathBuf],
    output: &Path,
    stream_stderr: bool,
) -> Result<()> {
    enrich_chain(input, databases).run(None, output, stream_stderr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_database_becomes_a_repeated_flag() {
        let databases = [PathBuf::from("uniref30"), PathBuf::from("pdb70")];
        let chain = enrich_chain(Path::new("PF00001_seed.afa"), &databases);
        let search = chain.specs().first().unwrap().render();

        assert!(search.ends_with("-d uniref30 -d pdb70"));
    }

    #[test]
    fn the_search_parameters_are_fixed() {
        let databases = [PathBuf::from("uniref30")];
        let chain = enrich_chain(Path::new("PF00001_seed.afa"), &databases);
        let search = chain.specs().first().unwrap().render();

        assert_eq!(
            search,
            "hhblits -i PF00001_seed.afa -oa3m stdout -o /dev/null -v 0 \
             -cpu 8 -n 3 -e 1e-6 -cov 75 -id 90 -p 90 -d uniref30"
        );
    }

    #[test]
    fn the_search_feeds_the_shared_polish_tail() {
        let databases = [PathBuf::from("uniref30")];
        let chain = enrich_chain(Path::new("in.afa"), &databases);

        assert_eq!(chain.specs().len(), 1 + polish_specs().len());
        assert_eq!(chain.specs()[1].program(), "reformat.pl");
        assert_eq!(chain.specs().last().unwrap().program(), "seqkit");
    }
}
