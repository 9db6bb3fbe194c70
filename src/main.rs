use std::env;
use std::process::exit;
use std::time::Instant;

use doc_similarity::{DocumentCollection, Result, SimilarityMatrix, StopWordSet};

fn print_usage() {
    eprintln!("usage: doc-similarity <dir> [options]");
    eprintln!();
    eprintln!("options:");
    eprintln!("  --csv <path>        write the similarity matrix as CSV");
    eprintln!("  --top <n>           show the n most similar pairs (default 10)");
    eprintln!("  --threshold <t>     show pairs with score >= t instead of top-n");
    eprintln!("  --stopwords <file>  extra stop words, one per line");
    eprintln!("  --parallel          compute the pair loop on the rayon pool");
}

struct Options {
    dir: String,
    csv: Option<String>,
    top: usize,
    threshold: Option<f64>,
    stopwords: Option<String>,
    parallel: bool,
}

fn parse_args() -> Option<Options> {
    let mut args = env::args().skip(1);
    let mut options = Options {
        dir: String::new(),
        csv: None,
        top: 10,
        threshold: None,
        stopwords: None,
        parallel: false,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--csv" => options.csv = Some(args.next()?),
            "--top" => options.top = args.next()?.parse().ok()?,
            "--threshold" => options.threshold = Some(args.next()?.parse().ok()?),
            "--stopwords" => options.stopwords = Some(args.next()?),
            "--parallel" => options.parallel = true,
            "--help" | "-h" => return None,
            _ if options.dir.is_empty() && !arg.starts_with('-') => options.dir = arg,
            _ => return None,
        }
    }

    if options.dir.is_empty() {
        return None;
    }
    Some(options)
}

fn run(options: &Options) -> Result<()> {
    // 既定のストップワードに追加分を重ねる
    let mut stop_words = StopWordSet::default();
    if let Some(path) = &options.stopwords {
        let added = stop_words.load_from_file(path)?;
        eprintln!("[stage] loaded {added} extra stop words from {path}");
    }

    eprintln!("[stage] loading documents from {} ...", options.dir);
    let start = Instant::now();
    let collection = DocumentCollection::load_from_dir(&options.dir, Some(&stop_words))?;
    eprintln!(
        "[stage] loaded {} documents in {:.2?}",
        collection.len(),
        start.elapsed()
    );

    let start = Instant::now();
    let matrix = if options.parallel {
        SimilarityMatrix::build_parallel(&collection)?
    } else {
        SimilarityMatrix::build(&collection)?
    };
    eprintln!(
        "[stage] built {0}x{0} similarity matrix in {1:.2?}",
        matrix.size(),
        start.elapsed()
    );

    if let Some(path) = &options.csv {
        matrix.save_csv(path)?;
        eprintln!("[stage] matrix saved to {path}");
    }

    let pairs = match options.threshold {
        Some(threshold) => {
            println!("pairs with score >= {threshold:.2}:");
            matrix.filter_by_threshold(threshold)?
        }
        None => {
            println!("top {} most similar pairs:", options.top);
            matrix.top_similarities(options.top)?
        }
    };
    for pair in &pairs {
        println!("  {pair}");
    }
    if pairs.is_empty() {
        println!("  (none)");
    }

    Ok(())
}

fn main() {
    let options = match parse_args() {
        Some(options) => options,
        None => {
            print_usage();
            exit(2);
        }
    };

    if let Err(e) = run(&options) {
        eprintln!("[error] {e}");
        exit(1);
    }
}
