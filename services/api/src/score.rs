use ambassador::workflows::waitlist::{effective_points, ScoreBreakdown};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt::Write;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Accumulated points to score
    #[arg(long, allow_negative_numbers = true)]
    pub(crate) points: f64,
    /// Seed the jitter generator for a reproducible position
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Skip the random jitter and show the base position only
    #[arg(long)]
    pub(crate) no_jitter: bool,
}

pub(crate) fn run_score(args: ScoreArgs) {
    print!("{}", render_score(&args));
}

fn breakdown(args: &ScoreArgs) -> ScoreBreakdown {
    if args.no_jitter {
        return ScoreBreakdown::with_jitter(args.points, 0);
    }

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    };
    ScoreBreakdown::compute(args.points, &mut rng)
}

pub(crate) fn render_score(args: &ScoreArgs) -> String {
    let score = breakdown(args);
    let mut out = String::new();

    let _ = writeln!(out, "Waitlist score");
    let _ = writeln!(
        out,
        "Points: {} (scored as {})",
        args.points,
        effective_points(args.points)
    );
    let _ = writeln!(out, "Base position: {}", score.base);
    if args.no_jitter {
        let _ = writeln!(out, "Jitter: disabled");
    } else {
        let _ = writeln!(out, "Jitter: {:+}", score.jitter);
    }
    let _ = writeln!(out, "Position: {}", score.position);

    out
}
