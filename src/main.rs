use anyhow::Context;
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use wordtok::{
    Tokenizer, Vocabulary,
    analysis::{TokenFrequencies, TokenizationStats, VocabStats},
    config::{self, Config},
    corpus,
    vocab::tsv,
};

const EXAMPLES: &str = "\
Examples:
  wordtok train --config configs/small_model.yaml
  wordtok generate --prompt \"The future of AI is\"
  wordtok tokenize --text \"Hello, world!\" --corpus the-verdict.txt
  wordtok vocab --corpus the-verdict.txt --out vocabulary.txt --stats";

/// Word-level tokenizer toolkit.
#[derive(Debug, Parser)]
#[command(name = "wordtok", version, about, long_about = None, after_help = EXAMPLES)]
struct Cli {
    /// Raise log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` wins when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Train a model
    Train {
        /// Training configuration file
        #[arg(long)]
        config: PathBuf,
    },
    /// Generate text
    Generate {
        /// Text prompt for generation
        #[arg(long)]
        prompt: String,
        /// Model to use
        #[arg(long, default_value = "gpt2-small")]
        model: String,
        /// Maximum generation length
        #[arg(long, default_value_t = 100)]
        max_length: usize,
    },
    /// Tokenize text
    Tokenize(TokenizeArgs),
    /// Build a vocabulary from a corpus and save it
    Vocab(VocabArgs),
}

#[derive(Debug, Args)]
struct TokenizeArgs {
    /// Text to tokenize
    #[arg(long)]
    text: String,
    /// Tokenizer type
    #[arg(long, value_enum, default_value_t = TokenizerKind::Simple)]
    tokenizer: TokenizerKind,
    /// Vocabulary file to load (defaults to WORDTOK_VOCAB_PATH when it exists)
    #[arg(long, conflicts_with = "corpus")]
    vocab: Option<PathBuf>,
    /// Corpus to build the vocabulary from instead of loading one
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// Also print tokenization statistics
    #[arg(long)]
    stats: bool,
}

#[derive(Debug, Args)]
struct VocabArgs {
    /// Corpus file (defaults to WORDTOK_CORPUS_PATH)
    #[arg(long)]
    corpus: Option<PathBuf>,
    /// Output file (defaults to WORDTOK_VOCAB_PATH)
    #[arg(long)]
    out: Option<PathBuf>,
    /// Print vocabulary statistics
    #[arg(long)]
    stats: bool,
    /// Print the N most frequent corpus tokens
    #[arg(long, value_name = "N")]
    top: Option<usize>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum TokenizerKind {
    /// Punctuation and whitespace splitting over a sorted word vocabulary
    Simple,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        eprintln!("{}", Cli::command().render_help());
        std::process::exit(1);
    };

    let config = config::from_env().context("reading WORDTOK_* environment")?;
    run(command, &config)
}

/// Runs one subcommand. Only commands that tokenize validate the unknown marker.
fn run(command: Command, config: &Config) -> anyhow::Result<()> {
    match command {
        Command::Train { config: training } => {
            println!("Training model with config: {}", training.display());
            log::warn!("model training is not available in this build");
        }
        Command::Generate {
            prompt,
            model,
            max_length,
        } => {
            println!("Generating text with prompt: '{prompt}'");
            log::warn!(
                "generation with {model} (max {max_length} tokens) is not available in this build"
            );
        }
        Command::Tokenize(args) => {
            config.validate()?;
            tokenize(config, args)?;
        }
        Command::Vocab(args) => {
            config.validate()?;
            build_vocab(config, args)?;
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn tokenize(config: &Config, args: TokenizeArgs) -> anyhow::Result<()> {
    println!("Tokenizing: '{}'", args.text);
    log::debug!("using the {:?} tokenizer", args.tokenizer);

    let Some(vocab) = resolve_vocab(config, &args)? else {
        log::warn!(
            "no vocabulary found at {} or corpus at {}, pass --vocab or --corpus",
            config.vocab_path.display(),
            config.corpus_path.display()
        );
        return Ok(());
    };
    let tokenizer = Tokenizer::with_unk_token(vocab, &config.unk_token);

    let ids = tokenizer
        .encode(&args.text)
        .context("encoding input text")?;
    let tokens = tokenizer.tokens(&ids)?;
    println!("Tokens: {tokens:?}");
    println!("Token IDs: {ids:?}");
    println!("Number of tokens: {}", ids.len());
    let decoded = tokenizer.decode(&ids)?;
    println!("Decoded: {decoded}");
    println!("Perfect match: {}", decoded == args.text);

    if args.stats {
        if let Some(stats) = TokenizationStats::collect(&tokenizer, [&args.text])? {
            println!("{stats}");
        }
    }
    Ok(())
}

/// Explicit flags first, then whatever the configured paths point at.
fn resolve_vocab(config: &Config, args: &TokenizeArgs) -> anyhow::Result<Option<Vocabulary>> {
    if let Some(path) = &args.vocab {
        return load_vocab(path).map(Some);
    }
    if let Some(path) = &args.corpus {
        return vocab_from_corpus(config, path).map(Some);
    }
    if config.vocab_path.is_file() {
        return load_vocab(&config.vocab_path).map(Some);
    }
    if config.corpus_path.is_file() {
        return vocab_from_corpus(config, &config.corpus_path).map(Some);
    }
    Ok(None)
}

fn build_vocab(config: &Config, args: VocabArgs) -> anyhow::Result<()> {
    let corpus_path = args.corpus.as_deref().unwrap_or(&config.corpus_path);
    let out = args.out.as_deref().unwrap_or(&config.vocab_path);

    let text = read_corpus(config, corpus_path)?;
    let vocab = Vocabulary::from_corpus(&text).with_special([&config.unk_token]);
    tsv::save(&vocab, out)?;
    println!("Vocabulary size: {}", vocab.len());
    println!("Vocabulary saved to: {}", out.display());

    if args.stats {
        if let Some(stats) = VocabStats::of(&vocab) {
            println!("{stats}");
        }
    }
    if let Some(n) = args.top {
        print!("{}", TokenFrequencies::count(wordtok::split(&text), n));
    }
    Ok(())
}

fn load_vocab(path: &Path) -> anyhow::Result<Vocabulary> {
    tsv::load(path).with_context(|| format!("loading vocabulary {}", path.display()))
}

fn vocab_from_corpus(config: &Config, path: &Path) -> anyhow::Result<Vocabulary> {
    let text = read_corpus(config, path)?;
    Ok(Vocabulary::from_corpus(&text).with_special([&config.unk_token]))
}

fn read_corpus(config: &Config, path: &Path) -> anyhow::Result<String> {
    let text = if config.lossy_corpus {
        corpus::load_text_lossy(path)
    } else {
        corpus::load_text(path)
    };
    text.with_context(|| format!("reading corpus {}", path.display()))
}
