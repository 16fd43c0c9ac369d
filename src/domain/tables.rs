//! Sexagenary tables: the ten Heavenly Stems, the twelve Earthly Branches and
//! the five-element relation cycle.
//!
//! Everything here is `const` data. Ordinal lookups are total (reduced modulo
//! the cycle length); symbol lookups fail with [`SajuError::UnknownSymbol`].

use crate::utils::error::{Result, SajuError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

impl Element {
    /// Declaration order; also the tie-break order for element rankings.
    pub const ALL: [Element; 5] = [
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
        Element::Water,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// The element this one feeds (相生).
    pub fn generates(self) -> Element {
        match self {
            Element::Wood => Element::Fire,
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
            Element::Metal => Element::Water,
            Element::Water => Element::Wood,
        }
    }

    /// The element this one overcomes (相剋).
    pub fn controls(self) -> Element {
        match self {
            Element::Wood => Element::Earth,
            Element::Earth => Element::Water,
            Element::Water => Element::Fire,
            Element::Fire => Element::Metal,
            Element::Metal => Element::Wood,
        }
    }

    pub fn generated_by(self) -> Element {
        Element::ALL
            .into_iter()
            .find(|e| e.generates() == self)
            .unwrap_or(self)
    }

    pub fn controlled_by(self) -> Element {
        Element::ALL
            .into_iter()
            .find(|e| e.controls() == self)
            .unwrap_or(self)
    }

    pub fn hanja(self) -> &'static str {
        match self {
            Element::Wood => "木",
            Element::Fire => "火",
            Element::Earth => "土",
            Element::Metal => "金",
            Element::Water => "水",
        }
    }

    pub fn korean(self) -> &'static str {
        match self {
            Element::Wood => "목",
            Element::Fire => "화",
            Element::Earth => "토",
            Element::Metal => "금",
            Element::Water => "수",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::Wood => "Wood",
            Element::Fire => "Fire",
            Element::Earth => "Earth",
            Element::Metal => "Metal",
            Element::Water => "Water",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Element {
    type Err = SajuError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Element::ALL
            .into_iter()
            .find(|e| {
                e.to_string().eq_ignore_ascii_case(needle)
                    || e.hanja() == needle
                    || e.korean() == needle
            })
            .ok_or_else(|| SajuError::UnknownSymbol {
                kind: "element",
                symbol: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Yang,
    Yin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stem {
    Gap,
    Eul,
    Byeong,
    Jeong,
    Mu,
    Gi,
    Gyeong,
    Sin,
    Im,
    Gye,
}

struct StemInfo {
    hanja: &'static str,
    korean: &'static str,
    romanized: &'static str,
    element: Element,
}

const STEM_TABLE: [StemInfo; 10] = [
    StemInfo { hanja: "甲", korean: "갑", romanized: "Gap", element: Element::Wood },
    StemInfo { hanja: "乙", korean: "을", romanized: "Eul", element: Element::Wood },
    StemInfo { hanja: "丙", korean: "병", romanized: "Byeong", element: Element::Fire },
    StemInfo { hanja: "丁", korean: "정", romanized: "Jeong", element: Element::Fire },
    StemInfo { hanja: "戊", korean: "무", romanized: "Mu", element: Element::Earth },
    StemInfo { hanja: "己", korean: "기", romanized: "Gi", element: Element::Earth },
    StemInfo { hanja: "庚", korean: "경", romanized: "Gyeong", element: Element::Metal },
    StemInfo { hanja: "辛", korean: "신", romanized: "Sin", element: Element::Metal },
    StemInfo { hanja: "壬", korean: "임", romanized: "Im", element: Element::Water },
    StemInfo { hanja: "癸", korean: "계", romanized: "Gye", element: Element::Water },
];

impl Stem {
    pub const COUNT: usize = 10;

    pub const ALL: [Stem; 10] = [
        Stem::Gap,
        Stem::Eul,
        Stem::Byeong,
        Stem::Jeong,
        Stem::Mu,
        Stem::Gi,
        Stem::Gyeong,
        Stem::Sin,
        Stem::Im,
        Stem::Gye,
    ];

    pub fn from_ordinal(ordinal: i64) -> Stem {
        Stem::ALL[ordinal.rem_euclid(Self::COUNT as i64) as usize]
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }

    fn info(self) -> &'static StemInfo {
        &STEM_TABLE[self.ordinal()]
    }

    pub fn element(self) -> Element {
        self.info().element
    }

    pub fn polarity(self) -> Polarity {
        if self.ordinal() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    pub fn hanja(self) -> &'static str {
        self.info().hanja
    }

    pub fn korean(self) -> &'static str {
        self.info().korean
    }

    pub fn romanized(self) -> &'static str {
        self.info().romanized
    }
}

impl fmt::Display for Stem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hanja())
    }
}

impl FromStr for Stem {
    type Err = SajuError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Stem::ALL
            .into_iter()
            .find(|stem| {
                stem.hanja() == needle
                    || stem.korean() == needle
                    || stem.romanized().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| SajuError::UnknownSymbol {
                kind: "stem",
                symbol: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Branch {
    Ja,
    Chuk,
    In,
    Myo,
    Jin,
    Sa,
    O,
    Mi,
    Sin,
    Yu,
    Sul,
    Hae,
}

struct BranchInfo {
    hanja: &'static str,
    korean: &'static str,
    romanized: &'static str,
    animal: &'static str,
    element: Element,
}

const BRANCH_TABLE: [BranchInfo; 12] = [
    BranchInfo { hanja: "子", korean: "자", romanized: "Ja", animal: "Rat", element: Element::Water },
    BranchInfo { hanja: "丑", korean: "축", romanized: "Chuk", animal: "Ox", element: Element::Earth },
    BranchInfo { hanja: "寅", korean: "인", romanized: "In", animal: "Tiger", element: Element::Wood },
    BranchInfo { hanja: "卯", korean: "묘", romanized: "Myo", animal: "Rabbit", element: Element::Wood },
    BranchInfo { hanja: "辰", korean: "진", romanized: "Jin", animal: "Dragon", element: Element::Earth },
    BranchInfo { hanja: "巳", korean: "사", romanized: "Sa", animal: "Snake", element: Element::Fire },
    BranchInfo { hanja: "午", korean: "오", romanized: "O", animal: "Horse", element: Element::Fire },
    BranchInfo { hanja: "未", korean: "미", romanized: "Mi", animal: "Goat", element: Element::Earth },
    BranchInfo { hanja: "申", korean: "신", romanized: "Sin", animal: "Monkey", element: Element::Metal },
    BranchInfo { hanja: "酉", korean: "유", romanized: "Yu", animal: "Rooster", element: Element::Metal },
    BranchInfo { hanja: "戌", korean: "술", romanized: "Sul", animal: "Dog", element: Element::Earth },
    BranchInfo { hanja: "亥", korean: "해", romanized: "Hae", animal: "Pig", element: Element::Water },
];

impl Branch {
    pub const COUNT: usize = 12;

    pub const ALL: [Branch; 12] = [
        Branch::Ja,
        Branch::Chuk,
        Branch::In,
        Branch::Myo,
        Branch::Jin,
        Branch::Sa,
        Branch::O,
        Branch::Mi,
        Branch::Sin,
        Branch::Yu,
        Branch::Sul,
        Branch::Hae,
    ];

    pub fn from_ordinal(ordinal: i64) -> Branch {
        Branch::ALL[ordinal.rem_euclid(Self::COUNT as i64) as usize]
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }

    fn info(self) -> &'static BranchInfo {
        &BRANCH_TABLE[self.ordinal()]
    }

    pub fn element(self) -> Element {
        self.info().element
    }

    pub fn polarity(self) -> Polarity {
        if self.ordinal() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    pub fn animal(self) -> &'static str {
        self.info().animal
    }

    pub fn hanja(self) -> &'static str {
        self.info().hanja
    }

    pub fn korean(self) -> &'static str {
        self.info().korean
    }

    pub fn romanized(self) -> &'static str {
        self.info().romanized
    }

    /// Branches sharing `ordinal % 4` form a trine (三合) group.
    pub fn trine_group(self) -> usize {
        self.ordinal() % 4
    }

    /// Branch shifted forward by `steps` around the cycle.
    pub fn offset(self, steps: i64) -> Branch {
        Branch::from_ordinal(self.ordinal() as i64 + steps)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hanja())
    }
}

impl FromStr for Branch {
    type Err = SajuError;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim();
        Branch::ALL
            .into_iter()
            .find(|branch| {
                branch.hanja() == needle
                    || branch.korean() == needle
                    || branch.romanized().eq_ignore_ascii_case(needle)
                    || branch.animal().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| SajuError::UnknownSymbol {
                kind: "branch",
                symbol: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stem_elements_pair_up() {
        for pair in Stem::ALL.chunks(2) {
            assert_eq!(pair[0].element(), pair[1].element());
            assert_eq!(pair[0].polarity(), Polarity::Yang);
            assert_eq!(pair[1].polarity(), Polarity::Yin);
        }
    }

    #[test]
    fn test_branch_lookup_by_any_name() {
        assert_eq!("子".parse::<Branch>().unwrap(), Branch::Ja);
        assert_eq!("해".parse::<Branch>().unwrap(), Branch::Hae);
        assert_eq!("rooster".parse::<Branch>().unwrap(), Branch::Yu);
        assert!("Dragonfly".parse::<Branch>().is_err());
    }

    #[test]
    fn test_stem_lookup_rejects_unknown_symbol() {
        assert_eq!("庚".parse::<Stem>().unwrap(), Stem::Gyeong);
        match "X".parse::<Stem>() {
            Err(SajuError::UnknownSymbol { kind, .. }) => assert_eq!(kind, "stem"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_element_cycles_close() {
        for element in Element::ALL {
            let mut e = element;
            for _ in 0..5 {
                e = e.generates();
            }
            assert_eq!(e, element);
            assert_eq!(element.generates().generated_by(), element);
            assert_eq!(element.controls().controlled_by(), element);
            assert_ne!(element.generates(), element.controls());
        }
    }

    #[test]
    fn test_ordinals_wrap() {
        assert_eq!(Stem::from_ordinal(-1), Stem::Gye);
        assert_eq!(Branch::from_ordinal(12), Branch::Ja);
        assert_eq!(Branch::Hae.offset(1), Branch::Ja);
        assert_eq!(Branch::Ja.offset(-3), Branch::Yu);
    }
}
