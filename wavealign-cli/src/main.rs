use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, ensure, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use log::{error, info, LevelFilter};
use num_bigint::BigUint;
use wavealign_core::align::batch::pairwise_table;
use wavealign_core::io::{read_fasta_from_path, read_first_from_path, write_pairwise_csv};
use wavealign_core::{
    AffineGap, AlignError, AlignResult, Alignment, Cost, GapCost, GapModel, GlobalAligner,
    LinearGap, ScoreMatrix, Scoring, Sequence, SequentialAligner, WavefrontAligner,
};

#[derive(Parser, Debug)]
#[command(name = "wavealign", version, about = "Exact min-cost global pairwise alignment")]
struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Optimal cost under a linear gap penalty
    Linear {
        #[command(flatten)]
        input: PairInput,
        #[command(flatten)]
        run: RunOptions,
        /// Gap penalty per residue
        #[arg(long, allow_hyphen_values = true)]
        gap: i64,
        /// Also print one optimal alignment
        #[arg(long)]
        traceback: bool,
    },
    /// Optimal cost and number of optimal alignments under a linear gap penalty
    Count {
        #[command(flatten)]
        input: PairInput,
        #[command(flatten)]
        run: RunOptions,
        #[arg(long, allow_hyphen_values = true)]
        gap: i64,
    },
    /// Optimal cost and count under an affine gap penalty alpha + beta * k
    Affine {
        #[command(flatten)]
        input: PairInput,
        #[command(flatten)]
        run: RunOptions,
        /// Gap opening cost
        #[arg(long, allow_hyphen_values = true)]
        alpha: i64,
        /// Per-residue gap cost
        #[arg(long, allow_hyphen_values = true)]
        beta: i64,
        #[arg(long)]
        traceback: bool,
    },
    /// Cost and count for every pair of records in one FASTA file, as CSV
    Table {
        #[arg(long)]
        fasta: PathBuf,
        #[arg(long)]
        matrix: PathBuf,
        /// Linear gap penalty (mutually exclusive with --alpha/--beta)
        #[arg(long, allow_hyphen_values = true, conflicts_with_all = ["alpha", "beta"])]
        gap: Option<i64>,
        #[arg(long, allow_hyphen_values = true, requires = "beta")]
        alpha: Option<i64>,
        #[arg(long, allow_hyphen_values = true, requires = "alpha")]
        beta: Option<i64>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct PairInput {
    #[arg(long)]
    seq1: Option<String>,
    #[arg(long)]
    seq2: Option<String>,
    #[arg(long)]
    fasta1: Option<PathBuf>,
    #[arg(long)]
    fasta2: Option<PathBuf>,
}

impl PairInput {
    fn resolve(&self) -> Result<(Sequence, Sequence)> {
        match (&self.seq1, &self.seq2, &self.fasta1, &self.fasta2) {
            (Some(a), Some(b), None, None) => {
                Ok((Sequence::from_residues(a), Sequence::from_residues(b)))
            }
            (None, None, Some(fa), Some(fb)) => Ok((read_first(fa)?, read_first(fb)?)),
            _ => bail!(
                "provide exactly one input mode: (--seq1 and --seq2) or (--fasta1 and --fasta2)"
            ),
        }
    }
}

#[derive(Args, Debug)]
struct RunOptions {
    /// PHYLIP-style substitution cost matrix
    #[arg(long)]
    matrix: PathBuf,
    /// Line width for printed alignments
    #[arg(long, default_value_t = 60)]
    wrap: usize,
    /// Write the report here instead of stdout
    #[arg(long)]
    out: Option<PathBuf>,
    /// Worker threads; more than one selects the wavefront engine
    #[arg(long, default_value_t = 1)]
    threads: usize,
}

/// Engine chosen from `--threads`.
enum Engine {
    Sequential,
    Wavefront(WavefrontAligner),
}

impl Engine {
    fn new(threads: usize) -> Result<Self> {
        if threads > 1 {
            info!("Using wavefront parallelism with {threads} threads");
            Ok(Engine::Wavefront(WavefrontAligner::new(threads)?))
        } else if threads == 0 {
            Err(AlignError::InvalidThreads { threads }.into())
        } else {
            Ok(Engine::Sequential)
        }
    }
}

impl<G: GapCost> GlobalAligner<G> for Engine
where
    SequentialAligner: GlobalAligner<G>,
    WavefrontAligner: GlobalAligner<G>,
{
    fn compute_cost<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &G,
    ) -> AlignResult<Cost> {
        match self {
            Engine::Sequential => {
                GlobalAligner::<G>::compute_cost(&SequentialAligner, a, b, scoring, gap)
            }
            Engine::Wavefront(w) => GlobalAligner::<G>::compute_cost(w, a, b, scoring, gap),
        }
    }

    fn align<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &G,
    ) -> AlignResult<Alignment> {
        match self {
            Engine::Sequential => GlobalAligner::<G>::align(&SequentialAligner, a, b, scoring, gap),
            Engine::Wavefront(w) => GlobalAligner::<G>::align(w, a, b, scoring, gap),
        }
    }

    fn cost_and_count<S: Scoring + ?Sized>(
        &self,
        a: &[u8],
        b: &[u8],
        scoring: &S,
        gap: &G,
    ) -> AlignResult<(Cost, BigUint)> {
        match self {
            Engine::Sequential => {
                GlobalAligner::<G>::cost_and_count(&SequentialAligner, a, b, scoring, gap)
            }
            Engine::Wavefront(w) => GlobalAligner::<G>::cost_and_count(w, a, b, scoring, gap),
        }
    }
}

fn read_first(path: &Path) -> Result<Sequence> {
    read_first_from_path(path).with_context(|| format!("reading {}", path.display()))
}

fn load_matrix(path: &Path) -> Result<ScoreMatrix> {
    ScoreMatrix::from_path(path)
        .with_context(|| format!("loading score matrix {}", path.display()))
}

/// Break `text` into lines of at most `width` characters.
fn wrap(text: &str, width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width.max(1))
        .map(|line| line.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_alignment(report: &mut String, alignment: &Alignment, width: usize) {
    report.push_str("\n>seq1\n");
    report.push_str(&wrap(&alignment.aligned_a, width));
    report.push_str("\n>seq2\n");
    report.push_str(&wrap(&alignment.aligned_b, width));
}

/// Run one parsed command; returns the report and where it should go.
fn run(command: &Command) -> Result<(String, Option<PathBuf>)> {
    match command {
        Command::Linear {
            input,
            run,
            gap,
            traceback,
        } => {
            ensure!(run.wrap > 0, "--wrap must be positive, got {}", run.wrap);
            let (a, b) = input.resolve()?;
            let matrix = load_matrix(&run.matrix)?;
            let gap = LinearGap::new(*gap)?;
            let engine = Engine::new(run.threads)?;
            let report = if *traceback {
                let alignment = engine.align(a.residues(), b.residues(), &matrix, &gap)?;
                let mut report = format!("cost: {}", alignment.cost);
                render_alignment(&mut report, &alignment, run.wrap);
                report
            } else {
                engine
                    .compute_cost(a.residues(), b.residues(), &matrix, &gap)?
                    .to_string()
            };
            Ok((report, run.out.clone()))
        }
        Command::Count { input, run, gap } => {
            let (a, b) = input.resolve()?;
            let matrix = load_matrix(&run.matrix)?;
            let gap = LinearGap::new(*gap)?;
            let engine = Engine::new(run.threads)?;
            let (cost, count) = engine.cost_and_count(a.residues(), b.residues(), &matrix, &gap)?;
            Ok((format!("cost: {cost}\ncount: {count}"), run.out.clone()))
        }
        Command::Affine {
            input,
            run,
            alpha,
            beta,
            traceback,
        } => {
            ensure!(run.wrap > 0, "--wrap must be positive, got {}", run.wrap);
            let (a, b) = input.resolve()?;
            let matrix = load_matrix(&run.matrix)?;
            let gap = AffineGap::new(*alpha, *beta)?;
            let engine = Engine::new(run.threads)?;
            let (cost, count) = engine.cost_and_count(a.residues(), b.residues(), &matrix, &gap)?;
            let mut report = format!("cost: {cost}\ncount: {count}");
            if *traceback {
                let alignment = engine.align(a.residues(), b.residues(), &matrix, &gap)?;
                render_alignment(&mut report, &alignment, run.wrap);
            }
            Ok((report, run.out.clone()))
        }
        Command::Table {
            fasta,
            matrix,
            gap,
            alpha,
            beta,
            out,
        } => {
            let model = match (gap, alpha, beta) {
                (Some(g), None, None) => GapModel::linear(*g)?,
                (None, Some(a), Some(b)) => GapModel::affine(*a, *b)?,
                _ => bail!("provide either --gap or both --alpha and --beta"),
            };
            let seqs = read_fasta_from_path(fasta)
                .with_context(|| format!("reading {}", fasta.display()))?;
            let matrix = load_matrix(matrix)?;
            info!("Aligning {} records pairwise", seqs.len());
            let entries = pairwise_table(&seqs, &matrix, &model)?;
            let mut buf = Vec::new();
            write_pairwise_csv(&mut buf, &entries)?;
            let mut report = String::from_utf8(buf).context("table is not valid UTF-8")?;
            // The writer ends every row with a newline; emit() adds the last one.
            if report.ends_with('\n') {
                report.pop();
            }
            Ok((report, out.clone()))
        }
    }
}

/// Print `report` or write it to `out`, creating parent directories as needed.
fn emit(report: &str, out: Option<&Path>) -> Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(path, format!("{report}\n"))
                .with_context(|| format!("writing {}", path.display()))
        }
        None => {
            println!("{report}");
            Ok(())
        }
    }
}

fn execute(cli: &Cli) -> Result<()> {
    let (report, out) = run(&cli.command)?;
    emit(&report, out.as_deref())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = execute(&cli) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const AC_MATRIX: &str = "2\nA 0 5\nC 5 0\n";

    #[test]
    fn verify_cli() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    /// Fresh scratch directory under the system temp dir.
    fn scratch() -> PathBuf {
        static NEXT: AtomicUsize = AtomicUsize::new(0);
        let dir = std::env::temp_dir().join(format!(
            "wavealign-cli-{}-{}",
            std::process::id(),
            NEXT.fetch_add(1, Ordering::Relaxed)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn matrix_file(dir: &Path) -> String {
        let path = dir.join("ac.txt");
        fs::write(&path, AC_MATRIX).unwrap();
        path.to_str().unwrap().to_owned()
    }

    fn report(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(args)?;
        run(&cli.command).map(|(text, _)| text)
    }

    #[test]
    fn wrap_splits_every_width_chars() {
        assert_eq!(wrap("ACGTACG", 3), "ACG\nTAC\nG");
        assert_eq!(wrap("ACG", 3), "ACG");
        assert_eq!(wrap("AC", 60), "AC");
        assert_eq!(wrap("", 4), "");
    }

    #[test]
    fn linear_cost_only() {
        let dir = scratch();
        let m = matrix_file(&dir);
        let text = report(&[
            "wavealign", "linear", "--seq1", "AC", "--seq2", "A", "--matrix", &m, "--gap", "2",
        ])
        .unwrap();
        assert_eq!(text, "2");
    }

    #[test]
    fn linear_traceback_wraps() {
        let dir = scratch();
        let m = matrix_file(&dir);
        let text = report(&[
            "wavealign", "linear", "--seq1", "AC", "--seq2", "A", "--matrix", &m, "--gap", "2",
            "--traceback", "--wrap", "1",
        ])
        .unwrap();
        assert_eq!(text, "cost: 2\n>seq1\nA\nC\n>seq2\nA\n-");
    }

    #[test]
    fn count_reports_cost_and_count() {
        let dir = scratch();
        let m = matrix_file(&dir);
        for threads in ["1", "2"] {
            let text = report(&[
                "wavealign", "count", "--seq1", "A", "--seq2", "AA", "--matrix", &m, "--gap",
                "2", "--threads", threads,
            ])
            .unwrap();
            assert_eq!(text, "cost: 2\ncount: 2");
        }
    }

    #[test]
    fn affine_with_traceback_from_fasta() {
        let dir = scratch();
        let m = matrix_file(&dir);
        let f1 = dir.join("a.fa");
        let f2 = dir.join("b.fa");
        fs::write(&f1, ">a first\nAA\nA\n>ignored\nC\n").unwrap();
        fs::write(&f2, ">b\nA\n").unwrap();
        for threads in ["1", "4"] {
            let text = report(&[
                "wavealign",
                "affine",
                "--fasta1",
                f1.to_str().unwrap(),
                "--fasta2",
                f2.to_str().unwrap(),
                "--matrix",
                &m,
                "--alpha",
                "10",
                "--beta",
                "3",
                "--traceback",
                "--threads",
                threads,
            ])
            .unwrap();
            assert_eq!(text, "cost: 16\ncount: 2\n>seq1\nAAA\n>seq2\n--A");
        }
    }

    #[test]
    fn mixed_input_modes_rejected() {
        let dir = scratch();
        let m = matrix_file(&dir);
        let err = report(&[
            "wavealign", "linear", "--seq1", "A", "--fasta2", "x.fa", "--matrix", &m, "--gap",
            "1",
        ])
        .unwrap_err();
        assert!(err.to_string().contains("exactly one input mode"));
    }

    #[test]
    fn invalid_parameters_rejected() {
        let dir = scratch();
        let m = matrix_file(&dir);
        let negative = report(&[
            "wavealign", "linear", "--seq1", "A", "--seq2", "A", "--matrix", &m, "--gap", "-1",
        ]);
        assert!(negative.is_err());
        let zero_wrap = report(&[
            "wavealign", "linear", "--seq1", "A", "--seq2", "A", "--matrix", &m, "--gap", "1",
            "--wrap", "0",
        ]);
        assert!(zero_wrap.is_err());
        let zero_threads = report(&[
            "wavealign", "count", "--seq1", "A", "--seq2", "A", "--matrix", &m, "--gap", "1",
            "--threads", "0",
        ]);
        assert!(zero_threads.is_err());
        let unknown = report(&[
            "wavealign", "count", "--seq1", "AG", "--seq2", "A", "--matrix", &m, "--gap", "1",
        ])
        .unwrap_err();
        assert!(format!("{unknown:#}").contains("unknown symbol 'G'"));
    }

    #[test]
    fn table_writes_csv_to_out() {
        let dir = scratch();
        let m = matrix_file(&dir);
        let fasta = dir.join("all.fa");
        fs::write(&fasta, ">x\nAC\n>y\nA\n>z\nAA\n").unwrap();
        let out = dir.join("nested").join("table.csv");
        let cli = Cli::try_parse_from([
            "wavealign",
            "table",
            "--fasta",
            fasta.to_str().unwrap(),
            "--matrix",
            &m,
            "--gap",
            "2",
            "--out",
            out.to_str().unwrap(),
        ])
        .unwrap();
        execute(&cli).unwrap();
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "seq_a,seq_b,cost,count\nx,y,2,1\nx,z,4,3\ny,z,2,2\n"
        );
    }

    #[test]
    fn table_needs_a_gap_model() {
        let dir = scratch();
        let m = matrix_file(&dir);
        let fasta = dir.join("all.fa");
        fs::write(&fasta, ">x\nA\n>y\nC\n").unwrap();
        let err = report(&[
            "wavealign",
            "table",
            "--fasta",
            fasta.to_str().unwrap(),
            "--matrix",
            &m,
        ])
        .unwrap_err();
        assert!(err.to_string().contains("--gap"));
    }
}
