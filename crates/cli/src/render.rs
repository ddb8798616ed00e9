//! Plain-text rendering of reports for the terminal.

use chrono::{DateTime, Utc};
use std::fmt::Write;
use steamcheck_identity::IdentityFormats;
use steamcheck_profile::{BanSummary, ProfileReport};
use steamcheck_resolution::ResolvedIdentity;

const MISSING: &str = "—";
const UNAVAILABLE: &str = "N/A";

pub fn format_date(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|date| date.format("%a, %d %b %Y %H:%M:%S GMT").to_string())
        .unwrap_or_else(|| MISSING.to_string())
}

fn or_missing(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or(MISSING)
}

fn section(out: &mut String, title: &str, rows: &[(&str, String)]) {
    let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let _ = writeln!(out, "\n{title}");
    for (label, value) in rows {
        let _ = writeln!(out, "  {label:<width$}  {value}");
    }
}

/// The four identity encodings, or `N/A` for each when conversion failed.
pub fn steam_ids(
    formats: Option<&IdentityFormats>,
    canonical: &str,
) -> Vec<(&'static str, String)> {
    match formats {
        Some(formats) => vec![
            ("Steam2", formats.legacy.to_string()),
            ("Steam3", formats.universe_qualified.to_string()),
            ("Steam32", formats.account_id.to_string()),
            ("Steam64", formats.canonical.to_string()),
        ],
        None => vec![
            ("Steam2", UNAVAILABLE.to_string()),
            ("Steam3", UNAVAILABLE.to_string()),
            ("Steam32", UNAVAILABLE.to_string()),
            ("Steam64", canonical.to_string()),
        ],
    }
}

pub fn ban_line(bans: Option<&BanSummary>) -> String {
    let Some(bans) = bans else {
        return "? Ban status unknown".to_string();
    };

    let vac = if bans.vac_banned {
        format!("❌ VAC Banned ( {} bans )", bans.vac_ban_count)
    } else {
        "✔ VAC".to_string()
    };
    let economy = if bans.is_trade_restricted() {
        format!("❌ Economy: {}", bans.economy_ban)
    } else {
        "✔ Trade".to_string()
    };
    let community = if bans.community_banned {
        "❌ Community Banned"
    } else {
        "✔ Community"
    };
    format!("{vac} • {economy} • {community}")
}

pub fn profile_report(report: &ProfileReport) -> String {
    let mut out = String::new();
    let canonical = report.resolved.identity.to_string();

    let _ = writeln!(out, "{}", or_missing(report.persona_name.as_deref()));
    let _ = writeln!(out, "{}", report.profile_url);
    let _ = writeln!(out, "Real Name: {}", or_missing(report.real_name.as_deref()));

    section(
        &mut out,
        "Account Details",
        &[
            ("Country", or_missing(report.country_code.as_deref()).to_string()),
            ("Created", format_date(report.created_at)),
            (
                "Visibility",
                report
                    .visibility
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
            ),
        ],
    );
    section(
        &mut out,
        "Activity",
        &[
            (
                "Status",
                report
                    .persona_state
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "Unknown".to_string()),
            ),
            ("Last Online", format_date(report.last_online)),
        ],
    );
    section(
        &mut out,
        "Other",
        &[
            ("Playtime", report.playtime.to_string()),
            ("Games", report.games.to_string()),
            ("Friends", report.friends.to_string()),
        ],
    );

    let _ = writeln!(out, "\nBans / Trade / Community");
    let _ = writeln!(out, "  {}", ban_line(report.bans.as_ref()));

    section(
        &mut out,
        "Steam IDs",
        &steam_ids(report.identity_formats.as_ref(), &canonical),
    );

    if let Some(avatar) = &report.avatar_url {
        let _ = writeln!(out, "\nAvatar: {avatar}");
    }
    let _ = write!(
        out,
        "\nResolved via {} from \"{}\"",
        report.resolved.method.label(),
        report.resolved.input
    );
    out
}

pub fn resolved_identity(resolved: &ResolvedIdentity) -> String {
    format!(
        "{}  (via {} from \"{}\")",
        resolved.identity,
        resolved.method.label(),
        resolved.input
    )
}

pub fn identity_formats(formats: &IdentityFormats) -> String {
    let mut out = String::new();
    for (label, value) in steam_ids(Some(formats), &formats.canonical.to_string()) {
        let _ = writeln!(out, "{label:<8} {value}");
    }
    out.trim_end().to_string()
}
