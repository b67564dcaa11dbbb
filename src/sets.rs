//! Set abbreviations and set-hint matching
//!
//! Short codes users type ("base", "swsh", "evs") map to one or more
//! lower-cased substrings of canonical set names. The same table drives
//! both query classification and filtering of number lookups by set.

/// Abbreviation key -> canonical set-name substrings (all lower-case)
pub const SET_ABBREVIATIONS: &[(&str, &[&str])] = &[
    ("base", &["base set", "base set (shadowless)", "base set 2"]),
    ("bs", &["base set"]),
    ("jungle", &["jungle"]),
    ("fossil", &["fossil"]),
    ("tr", &["team rocket"]),
    ("rocket", &["team rocket", "team rocket returns"]),
    ("gym", &["gym heroes", "gym challenge"]),
    ("neo", &["neo genesis", "neo discovery", "neo revelation", "neo destiny"]),
    ("lc", &["legendary collection"]),
    ("ecard", &["expedition base set", "aquapolis", "skyridge"]),
    (
        "ex",
        &["ex ruby & sapphire", "ex sandstorm", "ex dragon", "ex emerald", "ex deoxys"],
    ),
    ("dp", &["diamond & pearl"]),
    ("pl", &["platinum"]),
    ("hgss", &["heartgold & soulsilver"]),
    ("bw", &["black & white"]),
    (
        "xy",
        &[
            "xy",
            "flashfire",
            "furious fists",
            "phantom forces",
            "primal clash",
            "roaring skies",
            "ancient origins",
            "breakthrough",
            "breakpoint",
            "fates collide",
            "steam siege",
            "evolutions",
        ],
    ),
    (
        "sm",
        &[
            "sun & moon",
            "guardians rising",
            "burning shadows",
            "crimson invasion",
            "ultra prism",
            "forbidden light",
            "celestial storm",
            "lost thunder",
            "team up",
            "unbroken bonds",
            "unified minds",
            "cosmic eclipse",
            "hidden fates",
        ],
    ),
    (
        "swsh",
        &[
            "sword & shield",
            "rebel clash",
            "darkness ablaze",
            "vivid voltage",
            "battle styles",
            "chilling reign",
            "evolving skies",
            "fusion strike",
            "brilliant stars",
            "astral radiance",
            "lost origin",
            "silver tempest",
            "crown zenith",
            "shining fates",
            "celebrations",
            "pokemon go",
        ],
    ),
    (
        "sv",
        &[
            "scarlet & violet",
            "paldea evolved",
            "obsidian flames",
            "151",
            "paradox rift",
            "paldean fates",
            "temporal forces",
            "twilight masquerade",
            "shrouded fable",
            "stellar crown",
            "surging sparks",
            "prismatic evolutions",
        ],
    ),
    ("hf", &["hidden fates"]),
    ("shf", &["shining fates"]),
    ("cel", &["celebrations"]),
    ("evs", &["evolving skies"]),
    ("crz", &["crown zenith"]),
    ("pgo", &["pokemon go"]),
    ("promo", &["black star promos"]),
];

/// Length at or below which a query prefix is assumed to be a set code
const SHORT_CODE_MAX_LEN: usize = 4;

/// Aliases registered for an abbreviation key
pub fn aliases_for(key: &str) -> Option<&'static [&'static str]> {
    SET_ABBREVIATIONS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, aliases)| *aliases)
}

fn all_aliases() -> impl Iterator<Item = &'static str> {
    SET_ABBREVIATIONS
        .iter()
        .flat_map(|(_, aliases)| aliases.iter().copied())
}

/// Heuristic: does this query prefix look like it names a set?
///
/// Accepted when the prefix is an abbreviation key, overlaps an alias in
/// either direction, mentions "set", or is short enough to be a set code.
/// The short-code rule also accepts short card names ("mew 151"); such
/// queries fall back to name search when the set filter finds nothing.
pub fn is_likely_set_hint(prefix: &str) -> bool {
    let prefix = prefix.trim().to_lowercase();
    if prefix.is_empty() {
        return false;
    }

    aliases_for(&prefix).is_some()
        || all_aliases().any(|alias| alias.contains(&prefix) || prefix.contains(alias))
        || prefix.contains("set")
        || prefix.chars().count() <= SHORT_CODE_MAX_LEN
}

/// Case-insensitive match of a user-supplied set hint against a set name
pub fn match_set_name(hint: &str, set_name: &str) -> bool {
    let hint = hint.trim().to_lowercase();
    let set_name = set_name.to_lowercase();
    if hint.is_empty() {
        return false;
    }

    if set_name.contains(&hint) {
        return true;
    }

    if let Some(aliases) = aliases_for(&hint) {
        if aliases.iter().any(|alias| set_name.contains(alias)) {
            return true;
        }
    }

    all_aliases().any(|alias| alias.contains(&hint) && set_name.contains(alias))
}
