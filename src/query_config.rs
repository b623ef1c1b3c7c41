/// Query selector (strongly-typed).
///
/// This enum represents the logical operations exposed to request-routing
/// code (CLI, HTTP layer). Parsing from strings is case-insensitive via
/// `TryFrom<&str>`, accepting the historical operation names alongside the
/// canonical ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryConfig {
    /// Token-aligned Mandarin readings.
    Pinyin,

    /// Token-aligned Cantonese readings.
    Jyutping,

    /// Convert to simplified script.
    Simp,

    /// Convert to traditional script.
    Trad,

    /// Classify the input's script.
    Guess,

    /// Combined per-token records plus an overall script guess.
    All,
}

impl TryFrom<&str> for QueryConfig {
    type Error = ();

    /// Accepted names: `"pinyin"`, `"jyutping"`, `"simp"`/`"simplified"`,
    /// `"trad"`/`"traditional"`/`"change_script"`, `"guess"`/`"guess_script"`,
    /// `"all"`.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.to_ascii_lowercase().as_str() {
            "pinyin" => Ok(Self::Pinyin),
            "jyutping" => Ok(Self::Jyutping),
            "simp" | "simplified" => Ok(Self::Simp),
            "trad" | "traditional" | "change_script" => Ok(Self::Trad),
            "guess" | "guess_script" => Ok(Self::Guess),
            "all" => Ok(Self::All),
            _ => Err(()),
        }
    }
}
