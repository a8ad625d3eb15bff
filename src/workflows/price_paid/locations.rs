use std::io::{BufRead, BufReader, Read};
use std::path::Path;

const LONDON_DISTRICTS: &[&str] = &[
    // Central
    "EC1A", "EC1M", "EC1N", "EC1P", "EC1R", "EC1V", "EC1Y", "EC2A", "EC2M", "EC2N", "EC2P",
    "EC2R", "EC2V", "EC2Y", "EC3A", "EC3M", "EC3N", "EC3P", "EC3R", "EC3V", "EC4A", "EC4M",
    "EC4N", "EC4P", "EC4R", "EC4V", "EC4Y", "WC1A", "WC1B", "WC1E", "WC1H", "WC1N", "WC1R",
    "WC1V", "WC1X", "WC2A", "WC2B", "WC2E", "WC2H", "WC2N", "WC2R",
    // East
    "E1", "E2", "E3", "E4", "E5", "E6", "E7", "E8", "E9", "E10", "E11", "E12", "E13", "E14",
    "E15", "E16", "E17", "E18", "E19", "E20",
    // North
    "N1", "N2", "N3", "N4", "N5", "N6", "N7", "N8", "N9", "N10", "N11", "N12", "N13", "N14",
    "N15", "N16", "N17", "N18", "N19", "N20", "N21", "N22",
    // North West
    "NW1", "NW2", "NW3", "NW4", "NW5", "NW6", "NW7", "NW8", "NW9", "NW10", "NW11",
    // South East
    "SE1", "SE2", "SE3", "SE4", "SE5", "SE6", "SE7", "SE8", "SE9", "SE10", "SE11", "SE12",
    "SE13", "SE14", "SE15", "SE16", "SE17", "SE18", "SE19", "SE20", "SE21", "SE22", "SE23",
    "SE24", "SE25", "SE26", "SE27", "SE28",
    // South West
    "SW1", "SW2", "SW3", "SW4", "SW5", "SW6", "SW7", "SW8", "SW9", "SW10", "SW11", "SW12",
    "SW13", "SW14", "SW15", "SW16", "SW17", "SW18", "SW19", "SW20",
    // West
    "W1", "W2", "W3", "W4", "W5", "W6", "W7", "W8", "W9", "W10", "W11", "W12", "W13", "W14",
];

/// Postcode districts an entry must belong to. Codes are kept sorted so that
/// membership is a binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSet {
    codes: Vec<String>,
}

impl LocationSet {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        codes.sort_unstable();
        codes.dedup();
        Self { codes }
    }

    pub fn london() -> Self {
        Self::new(LONDON_DISTRICTS.iter().copied())
    }

    /// One code per line. Blank lines and lines starting with `#` are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, std::io::Error> {
        let mut codes = Vec::new();
        for line in BufReader::new(reader).lines() {
            let line = line?;
            let code = line.trim();
            if code.is_empty() || code.starts_with('#') {
                continue;
            }
            codes.push(code.to_owned());
        }
        Ok(Self::new(codes))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, std::io::Error> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.codes
            .binary_search_by(|candidate| candidate.as_str().cmp(code))
            .is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl Default for LocationSet {
    fn default() -> Self {
        Self::london()
    }
}
