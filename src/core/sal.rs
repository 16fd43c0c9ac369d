//! Symbolic markers (신살) as a declarative rule table.
//!
//! Every [`SalRule`] pairs a descriptive template with an independent
//! detection function over the chart. Rules never consult each other, so
//! adding or removing an entry in [`SAL_RULES`] leaves the others unchanged.

use crate::domain::model::{Chart, PillarPosition, Sal};
use crate::domain::tables::{Branch, Stem};

#[derive(Debug, Clone, Copy)]
pub struct SalTemplate {
    pub name: &'static str,
    pub korean: &'static str,
    pub hanja: &'static str,
    pub positive: bool,
    pub origin: &'static str,
    pub keywords: &'static [&'static str],
    pub effect: &'static str,
    pub advice: &'static str,
}

pub struct SalRule {
    pub template: SalTemplate,
    /// Returns the chart locations where the pattern occurs; empty means absent.
    pub detect: fn(&Chart) -> Vec<String>,
}

impl SalRule {
    pub fn evaluate(&self, chart: &Chart) -> Option<Sal> {
        let locations = (self.detect)(chart);
        if locations.is_empty() {
            return None;
        }
        let t = &self.template;
        Some(Sal {
            name: t.name.to_string(),
            korean: t.korean.to_string(),
            hanja: t.hanja.to_string(),
            positive: t.positive,
            locations,
            origin: t.origin.to_string(),
            keywords: t.keywords.iter().map(|k| k.to_string()).collect(),
            effect: t.effect.to_string(),
            advice: t.advice.to_string(),
        })
    }
}

pub fn detect_sals(chart: &Chart) -> Vec<Sal> {
    SAL_RULES.iter().filter_map(|rule| rule.evaluate(chart)).collect()
}

fn push_unique(locations: &mut Vec<String>, location: String) {
    if !locations.contains(&location) {
        locations.push(location);
    }
}

/// Pillars (other than `skip`) whose branch is `target`.
fn branch_hits(chart: &Chart, target: Branch, skip: Option<PillarPosition>) -> Vec<String> {
    chart
        .pillars()
        .into_iter()
        .filter(|(position, pillar)| Some(*position) != skip && pillar.branch == target)
        .map(|(position, pillar)| format!("{} branch {}", position, pillar.branch))
        .collect()
}

/// The 지살 branch that opens a trine group's sequence of twelve spirits.
fn spirit_start(branch: Branch) -> Branch {
    Branch::from_ordinal(8 - 3 * branch.trine_group() as i64)
}

/// Twelve-spirit lookup, reckoned from both the year and the day branch.
fn twelve_spirit(chart: &Chart, step: i64) -> Vec<String> {
    let mut locations = Vec::new();
    for (base, base_branch) in [
        (PillarPosition::Year, chart.year.branch),
        (PillarPosition::Day, chart.day.branch),
    ] {
        let target = spirit_start(base_branch).offset(step);
        for hit in branch_hits(chart, target, Some(base)) {
            push_unique(&mut locations, format!("{} (from {} branch)", hit, base));
        }
    }
    locations
}

/// Looks up day-stem keyed target branches anywhere in the chart.
fn day_stem_targets(chart: &Chart, targets: fn(Stem) -> &'static [Branch]) -> Vec<String> {
    let mut locations = Vec::new();
    for &target in targets(chart.day_master()) {
        for hit in branch_hits(chart, target, None) {
            push_unique(&mut locations, hit);
        }
    }
    locations
}

fn geopsal(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, -3)
}

fn jaesal(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, -2)
}

fn cheonsal(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, -1)
}

fn jisal(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, 0)
}

fn dohwa(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, 1)
}

fn wolsal(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, 2)
}

fn mangsin(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, 3)
}

fn jangseong(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, 4)
}

fn banan(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, 5)
}

fn yeokma(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, 6)
}

fn yukhae(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, 7)
}

fn hwagae(chart: &Chart) -> Vec<String> {
    twelve_spirit(chart, 8)
}

fn nobleman_targets(stem: Stem) -> &'static [Branch] {
    match stem {
        Stem::Gap | Stem::Mu | Stem::Gyeong => &[Branch::Chuk, Branch::Mi],
        Stem::Eul | Stem::Gi => &[Branch::Ja, Branch::Sin],
        Stem::Byeong | Stem::Jeong => &[Branch::Hae, Branch::Yu],
        Stem::Sin => &[Branch::In, Branch::O],
        Stem::Im | Stem::Gye => &[Branch::Myo, Branch::Sa],
    }
}

fn cheoneul_gwiin(chart: &Chart) -> Vec<String> {
    day_stem_targets(chart, nobleman_targets)
}

fn literary_targets(stem: Stem) -> &'static [Branch] {
    match stem {
        Stem::Gap => &[Branch::Sa],
        Stem::Eul => &[Branch::O],
        Stem::Byeong | Stem::Mu => &[Branch::Sin],
        Stem::Jeong | Stem::Gi => &[Branch::Yu],
        Stem::Gyeong => &[Branch::Hae],
        Stem::Sin => &[Branch::Ja],
        Stem::Im => &[Branch::In],
        Stem::Gye => &[Branch::Myo],
    }
}

fn munchang_gwiin(chart: &Chart) -> Vec<String> {
    day_stem_targets(chart, literary_targets)
}

fn blade_targets(stem: Stem) -> &'static [Branch] {
    match stem {
        Stem::Gap => &[Branch::Myo],
        Stem::Byeong | Stem::Mu => &[Branch::O],
        Stem::Gyeong => &[Branch::Yu],
        Stem::Im => &[Branch::Ja],
        _ => &[],
    }
}

fn yangin(chart: &Chart) -> Vec<String> {
    day_stem_targets(chart, blade_targets)
}

fn red_flame_targets(stem: Stem) -> &'static [Branch] {
    match stem {
        Stem::Gap | Stem::Eul => &[Branch::O],
        Stem::Byeong => &[Branch::In],
        Stem::Jeong => &[Branch::Mi],
        Stem::Mu | Stem::Gi => &[Branch::Jin],
        Stem::Gyeong => &[Branch::Sul],
        Stem::Sin => &[Branch::Yu],
        Stem::Im => &[Branch::Ja],
        Stem::Gye => &[Branch::Sin],
    }
}

fn hongyeom(chart: &Chart) -> Vec<String> {
    day_stem_targets(chart, red_flame_targets)
}

fn golden_carriage_targets(stem: Stem) -> &'static [Branch] {
    match stem {
        Stem::Gap => &[Branch::Jin],
        Stem::Eul => &[Branch::Sa],
        Stem::Byeong | Stem::Mu => &[Branch::Mi],
        Stem::Jeong | Stem::Gi => &[Branch::Sin],
        Stem::Gyeong => &[Branch::Sul],
        Stem::Sin => &[Branch::Hae],
        Stem::Im => &[Branch::Chuk],
        Stem::Gye => &[Branch::In],
    }
}

fn geumyeorok(chart: &Chart) -> Vec<String> {
    day_stem_targets(chart, golden_carriage_targets)
}

const WHITE_TIGER_PILLARS: [(Stem, Branch); 7] = [
    (Stem::Gap, Branch::Jin),
    (Stem::Eul, Branch::Mi),
    (Stem::Byeong, Branch::Sul),
    (Stem::Jeong, Branch::Chuk),
    (Stem::Mu, Branch::Jin),
    (Stem::Im, Branch::Sul),
    (Stem::Gye, Branch::Chuk),
];

fn baekho(chart: &Chart) -> Vec<String> {
    chart
        .pillars()
        .into_iter()
        .filter(|(_, p)| WHITE_TIGER_PILLARS.contains(&(p.stem, p.branch)))
        .map(|(position, p)| format!("{} pillar {}", position, p))
        .collect()
}

const GOEGANG_PILLARS: [(Stem, Branch); 5] = [
    (Stem::Gyeong, Branch::Jin),
    (Stem::Gyeong, Branch::Sul),
    (Stem::Im, Branch::Jin),
    (Stem::Im, Branch::Sul),
    (Stem::Mu, Branch::Sul),
];

fn goegang(chart: &Chart) -> Vec<String> {
    let day = chart.day;
    if GOEGANG_PILLARS.contains(&(day.stem, day.branch)) {
        vec![format!("day pillar {}", day)]
    } else {
        Vec::new()
    }
}

const RESENTMENT_PAIRS: [(Branch, Branch); 6] = [
    (Branch::Ja, Branch::Mi),
    (Branch::Chuk, Branch::O),
    (Branch::In, Branch::Yu),
    (Branch::Myo, Branch::Sin),
    (Branch::Jin, Branch::Hae),
    (Branch::Sa, Branch::Sul),
];

fn wonjin(chart: &Chart) -> Vec<String> {
    let pillars = chart.pillars();
    let mut locations = Vec::new();
    for (i, (pos_a, a)) in pillars.iter().enumerate() {
        for (pos_b, b) in pillars.iter().skip(i + 1) {
            let pair = (a.branch, b.branch);
            if RESENTMENT_PAIRS
                .iter()
                .any(|&(x, y)| pair == (x, y) || pair == (y, x))
            {
                locations.push(format!(
                    "{} branch {} / {} branch {}",
                    pos_a, a.branch, pos_b, b.branch
                ));
            }
        }
    }
    locations
}

/// Season of the year branch: 亥子丑 = 0, 寅卯辰 = 1, 巳午未 = 2, 申酉戌 = 3.
fn season(branch: Branch) -> i64 {
    ((branch.ordinal() as i64 + 1) % 12) / 3
}

fn gosin(chart: &Chart) -> Vec<String> {
    let target = Branch::from_ordinal(season(chart.year.branch) * 3 + 2);
    branch_hits(chart, target, Some(PillarPosition::Year))
}

fn gwasuk(chart: &Chart) -> Vec<String> {
    let target = Branch::from_ordinal(season(chart.year.branch) * 3 - 2);
    branch_hits(chart, target, Some(PillarPosition::Year))
}

pub static SAL_RULES: [SalRule; 22] = [
    SalRule {
        template: SalTemplate {
            name: "Geop-sal",
            korean: "겁살",
            hanja: "劫殺",
            positive: false,
            origin: "First of the twelve spirits; the branch that robs the trine group's start.",
            keywords: &["loss", "sudden change", "competition"],
            effect: "Resources or plans can be taken away abruptly, often through other people.",
            advice: "Keep written agreements and avoid lending what you cannot afford to lose.",
        },
        detect: geopsal,
    },
    SalRule {
        template: SalTemplate {
            name: "Jae-sal",
            korean: "재살",
            hanja: "災殺",
            positive: false,
            origin: "Second spirit, also called the prison star; opposite the general star.",
            keywords: &["restriction", "dispute", "confinement"],
            effect: "Prone to entanglement in disputes or situations that limit freedom.",
            advice: "Settle conflicts early and read contracts carefully.",
        },
        detect: jaesal,
    },
    SalRule {
        template: SalTemplate {
            name: "Cheon-sal",
            korean: "천살",
            hanja: "天殺",
            positive: false,
            origin: "Third spirit; the branch just before the trine group opens.",
            keywords: &["uncontrollable events", "weather", "fate"],
            effect: "Faces events beyond personal control that reward humility.",
            advice: "Build buffers of time and money instead of fighting circumstances.",
        },
        detect: cheonsal,
    },
    SalRule {
        template: SalTemplate {
            name: "Ji-sal",
            korean: "지살",
            hanja: "地殺",
            positive: true,
            origin: "Fourth spirit; the opening branch of the trine group.",
            keywords: &["new start", "relocation", "initiative"],
            effect: "Life often begins new chapters through moves or fresh starts.",
            advice: "Welcome change, but finish what the previous chapter needs.",
        },
        detect: jisal,
    },
    SalRule {
        template: SalTemplate {
            name: "Dohwa-sal",
            korean: "도화살",
            hanja: "桃花殺",
            positive: true,
            origin: "Peach-blossom star; the branch of full bloom after the trine group opens.",
            keywords: &["charm", "popularity", "romance"],
            effect: "Draws attention easily; strong in arts, service and public-facing work.",
            advice: "Use the charm professionally and keep clear boundaries in relationships.",
        },
        detect: dohwa,
    },
    SalRule {
        template: SalTemplate {
            name: "Wol-sal",
            korean: "월살",
            hanja: "月殺",
            positive: false,
            origin: "Sixth spirit, the withered-root star.",
            keywords: &["stagnation", "dry spell", "delay"],
            effect: "Efforts can stall for a while before bearing fruit.",
            advice: "Keep steady routines during slow periods instead of forcing results.",
        },
        detect: wolsal,
    },
    SalRule {
        template: SalTemplate {
            name: "Mangsin-sal",
            korean: "망신살",
            hanja: "亡身殺",
            positive: false,
            origin: "Seventh spirit; the branch that exposes what was hidden.",
            keywords: &["embarrassment", "exposure", "reputation"],
            effect: "Careless words or actions can come to light at awkward moments.",
            advice: "Think before posting or speaking in public; guard your reputation.",
        },
        detect: mangsin,
    },
    SalRule {
        template: SalTemplate {
            name: "Jangseong-sal",
            korean: "장성살",
            hanja: "將星殺",
            positive: true,
            origin: "General star; the central branch of the trine group.",
            keywords: &["leadership", "authority", "pride"],
            effect: "Natural leader who rises to responsibility in organisations.",
            advice: "Lead by listening; authority lasts longer when shared.",
        },
        detect: jangseong,
    },
    SalRule {
        template: SalTemplate {
            name: "Banan-sal",
            korean: "반안살",
            hanja: "攀鞍殺",
            positive: true,
            origin: "Saddle star; the branch that follows the general star.",
            keywords: &["promotion", "stability", "reward"],
            effect: "Earns recognition and comfortable positions after steady work.",
            advice: "Keep learning once comfortable so the saddle does not become a trap.",
        },
        detect: banan,
    },
    SalRule {
        template: SalTemplate {
            name: "Yeokma-sal",
            korean: "역마살",
            hanja: "驛馬殺",
            positive: true,
            origin: "Post-horse star; the branch clashing with the trine group's opening.",
            keywords: &["travel", "movement", "trade"],
            effect: "Thrives on travel, relocation and work that keeps moving.",
            advice: "Channel restlessness into travel or mobile work; rest between journeys.",
        },
        detect: yeokma,
    },
    SalRule {
        template: SalTemplate {
            name: "Yukhae-sal",
            korean: "육해살",
            hanja: "六害殺",
            positive: false,
            origin: "Eleventh spirit; the branch of six harms.",
            keywords: &["fatigue", "health", "setbacks"],
            effect: "Minor health issues or obstacles appear when overextended.",
            advice: "Schedule regular check-ups and do not skip recovery time.",
        },
        detect: yukhae,
    },
    SalRule {
        template: SalTemplate {
            name: "Hwagae-sal",
            korean: "화개살",
            hanja: "華蓋殺",
            positive: true,
            origin: "Canopy star; the storehouse branch closing the trine group.",
            keywords: &["art", "spirituality", "solitude"],
            effect: "Gifted in art, religion and study; enjoys time alone.",
            advice: "Give creative and spiritual work a regular place in life.",
        },
        detect: hwagae,
    },
    SalRule {
        template: SalTemplate {
            name: "Cheoneul-gwiin",
            korean: "천을귀인",
            hanja: "天乙貴人",
            positive: true,
            origin: "Nobleman star keyed by the day stem.",
            keywords: &["helpers", "protection", "luck"],
            effect: "Help arrives from others at critical moments.",
            advice: "Stay grateful and keep in touch with mentors.",
        },
        detect: cheoneul_gwiin,
    },
    SalRule {
        template: SalTemplate {
            name: "Munchang-gwiin",
            korean: "문창귀인",
            hanja: "文昌貴人",
            positive: true,
            origin: "Literary star keyed by the day stem.",
            keywords: &["intellect", "writing", "exams"],
            effect: "Learns quickly and expresses ideas well in writing.",
            advice: "Pursue qualifications and keep a writing habit.",
        },
        detect: munchang_gwiin,
    },
    SalRule {
        template: SalTemplate {
            name: "Yangin-sal",
            korean: "양인살",
            hanja: "羊刃殺",
            positive: false,
            origin: "Goat-blade star; the peak branch of a yang day stem.",
            keywords: &["intensity", "courage", "conflict"],
            effect: "Powerful drive that can cut both ways in conflicts or accidents.",
            advice: "Use the edge in disciplined fields such as sport, surgery or law.",
        },
        detect: yangin,
    },
    SalRule {
        template: SalTemplate {
            name: "Hongyeom-sal",
            korean: "홍염살",
            hanja: "紅艶殺",
            positive: true,
            origin: "Red-flame star keyed by the day stem.",
            keywords: &["attraction", "passion", "sensitivity"],
            effect: "Magnetic presence with strong emotional pull.",
            advice: "Let passion fuel creative work rather than turbulent relationships.",
        },
        detect: hongyeom,
    },
    SalRule {
        template: SalTemplate {
            name: "Geumyeo-rok",
            korean: "금여록",
            hanja: "金輿祿",
            positive: true,
            origin: "Golden-carriage star keyed by the day stem.",
            keywords: &["comfort", "supportive partner", "grace"],
            effect: "Enjoys material comfort and supportive partnerships.",
            advice: "Share good fortune; generosity keeps the carriage moving.",
        },
        detect: geumyeorok,
    },
    SalRule {
        template: SalTemplate {
            name: "Baekho-sal",
            korean: "백호살",
            hanja: "白虎殺",
            positive: false,
            origin: "White-tiger pillars: seven stem-branch pairs of fierce energy.",
            keywords: &["accident", "bloodshed", "boldness"],
            effect: "Sudden, forceful events; also great stamina under pressure.",
            advice: "Take safety seriously when driving, training or handling tools.",
        },
        detect: baekho,
    },
    SalRule {
        template: SalTemplate {
            name: "Goegang-sal",
            korean: "괴강살",
            hanja: "魁罡殺",
            positive: false,
            origin: "Commanding day pillars of Metal and Water on storehouse branches.",
            keywords: &["strength", "extremes", "independence"],
            effect: "Strong will and leadership, with swings between great highs and lows.",
            advice: "Temper decisiveness with patience, especially in close relationships.",
        },
        detect: goegang,
    },
    SalRule {
        template: SalTemplate {
            name: "Wonjin-sal",
            korean: "원진살",
            hanja: "怨嗔殺",
            positive: false,
            origin: "Resentment pairs: branches that irritate each other.",
            keywords: &["friction", "misunderstanding", "resentment"],
            effect: "Recurring friction with people who are close.",
            advice: "Name small grievances early before they harden.",
        },
        detect: wonjin,
    },
    SalRule {
        template: SalTemplate {
            name: "Gosin-sal",
            korean: "고신살",
            hanja: "孤神殺",
            positive: false,
            origin: "Lonely-spirit star: first branch of the season after the year branch's.",
            keywords: &["solitude", "independence", "distance"],
            effect: "Tends to stand alone and feel distant even among family.",
            advice: "Make deliberate time for close friends and family.",
        },
        detect: gosin,
    },
    SalRule {
        template: SalTemplate {
            name: "Gwasuk-sal",
            korean: "과숙살",
            hanja: "寡宿殺",
            positive: false,
            origin: "Widow's-lodge star: last branch of the season before the year branch's.",
            keywords: &["separation", "self-reliance", "quiet"],
            effect: "Periods of living or working apart from partners.",
            advice: "Keep communication open when distance is unavoidable.",
        },
        detect: gwasuk,
    },
];
