//! # Submission Audit
//!
//! Command-line tool to re-judge a disputed reward submission.

use oroboros_anticheat::{
    AntiCheatConfig, Clock, FixedClock, GameSubmissionData, SubmissionValidator, SystemClock,
};

/// Parsed command line.
#[derive(Debug, PartialEq, Eq)]
struct AuditArgs {
    submission_path: String,
    games_path: Option<String>,
    now_ms: Option<i64>,
}

/// Parses everything after the program name. Flags may come before or after
/// the submission path.
fn parse_args(args: &[String]) -> Result<AuditArgs, String> {
    let mut submission_path = None;
    let mut games_path = None;
    let mut now_ms = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--games" => {
                let value = iter.next().ok_or("Missing value for --games")?;
                games_path = Some(value.clone());
            }
            "--now" => {
                let value = iter.next().ok_or("Missing value for --now")?;
                let parsed = value
                    .parse::<i64>()
                    .map_err(|e| format!("Could not parse --now: {value}: {e}"))?;
                now_ms = Some(parsed);
            }
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {flag}")),
            path if submission_path.is_none() => submission_path = Some(path.to_string()),
            extra => return Err(format!("Unexpected argument: {extra}")),
        }
    }

    Ok(AuditArgs {
        submission_path: submission_path.ok_or("Missing submission file")?,
        games_path,
        now_ms,
    })
}

fn print_usage() {
    println!("Usage: submission_audit <submission.toml>");
    println!();
    println!("Options:");
    println!("  --games <games.toml>  Game policy (default: built-in games)");
    println!("  --now <epoch_ms>      Judge as of this instant (default: now)");
}

fn main() {
    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║         OROBOROS SUBMISSION AUDIT                                ║");
    println!("║         THE REFEREE                                              ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");
    println!();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let AuditArgs {
        submission_path,
        games_path,
        now_ms,
    } = match parse_args(&args[1..]) {
        Ok(parsed) => parsed,
        Err(e) => {
            println!("Error: {e}");
            println!();
            print_usage();
            return;
        }
    };

    let config = match games_path.as_deref() {
        Some(path) => {
            println!("Loading game policy: {path}");
            match AntiCheatConfig::load(path) {
                Ok(c) => c,
                Err(e) => {
                    println!("Error: Could not load game policy: {e}");
                    return;
                }
            }
        }
        None => AntiCheatConfig::builtin(),
    };

    println!("Loading submission: {submission_path}");

    let source = match std::fs::read_to_string(&submission_path) {
        Ok(s) => s,
        Err(e) => {
            println!("Error: Could not open file: {e}");
            return;
        }
    };

    let submission: GameSubmissionData = match toml::from_str(&source) {
        Ok(s) => s,
        Err(e) => {
            println!("Error: Could not parse submission: {e}");
            return;
        }
    };

    let now_ms = now_ms.unwrap_or_else(|| SystemClock.now_ms());
    let validator = SubmissionValidator::from_config(config).with_clock(FixedClock(now_ms));
    let verdict = validator.validate(&submission);
    let quota = validator.remaining_quota(&submission.submission_history);

    println!();
    println!("┌─ SUBMISSION ───────────────────────────────────────────────────┐");
    println!("│ Game:               {}", submission.game_id);
    println!("│ User:               {}", submission.user_id);
    println!("│ Score:              {}", submission.score);
    println!("│ Duration:           {} ms", submission.duration_ms);
    if let Some(streak) = submission.streak {
        println!("│ Streak:             {streak}");
    }
    if let Some(previous) = submission.previous_score {
        println!("│ Previous score:     {previous}");
    }
    println!("│ History entries:    {}", submission.submission_history.len());
    println!("│ Judged at:          {now_ms}");
    println!("└────────────────────────────────────────────────────────────────┘");

    println!();
    println!("┌─ VERDICT ──────────────────────────────────────────────────────┐");
    println!(
        "│ Result:             {}",
        if verdict.valid { "ACCEPT" } else { "REJECT" }
    );
    println!("│ Confidence:         {:.2}", verdict.confidence());
    for error in &verdict.errors {
        println!("│ ✗ {error}");
    }
    for warning in &verdict.warnings {
        println!("│ ⚠ {warning}");
    }
    println!("└────────────────────────────────────────────────────────────────┘");

    println!();
    println!("┌─ QUOTA ────────────────────────────────────────────────────────┐");
    println!("│ Left this minute:   {}", quota.remaining_per_minute);
    println!("│ Left this hour:     {}", quota.remaining_per_hour);
    println!("│ Cooldown:           {} ms", quota.cooldown_remaining_ms);
    println!("└────────────────────────────────────────────────────────────────┘");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|a| (*a).to_string()).collect()
    }

    #[test]
    fn test_path_only() {
        let parsed = parse_args(&args(&["claim.toml"])).unwrap();
        assert_eq!(
            parsed,
            AuditArgs {
                submission_path: "claim.toml".to_string(),
                games_path: None,
                now_ms: None,
            }
        );
    }

    #[test]
    fn test_flags_before_path() {
        let parsed = parse_args(&args(&[
            "--games",
            "data/games.toml",
            "--now",
            "1700000000000",
            "claim.toml",
        ]))
        .unwrap();
        assert_eq!(parsed.submission_path, "claim.toml");
        assert_eq!(parsed.games_path.as_deref(), Some("data/games.toml"));
        assert_eq!(parsed.now_ms, Some(1_700_000_000_000));
    }

    #[test]
    fn test_bad_now_is_reported() {
        let err = parse_args(&args(&["claim.toml", "--now", "17e11"])).unwrap_err();
        assert!(err.starts_with("Could not parse --now: 17e11"));

        let err = parse_args(&args(&["claim.toml", "--now", "abc"])).unwrap_err();
        assert!(err.starts_with("Could not parse --now"));
    }

    #[test]
    fn test_missing_values_and_path() {
        assert!(parse_args(&args(&["claim.toml", "--now"])).is_err());
        assert!(parse_args(&args(&["claim.toml", "--games"])).is_err());
        assert_eq!(
            parse_args(&args(&["--games", "g.toml"])).unwrap_err(),
            "Missing submission file"
        );
    }

    #[test]
    fn test_unknown_option() {
        let err = parse_args(&args(&["claim.toml", "--fast"])).unwrap_err();
        assert_eq!(err, "Unknown option: --fast");
    }
}
