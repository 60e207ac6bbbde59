use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HairType {
    Straight,
    Wavy,
    Curly,
    Coily,
}

impl HairType {
    pub const ALL: [HairType; 4] = [HairType::Straight, HairType::Wavy, HairType::Curly, HairType::Coily];

    pub fn as_str(self) -> &'static str {
        match self {
            HairType::Straight => "straight",
            HairType::Wavy => "wavy",
            HairType::Curly => "curly",
            HairType::Coily => "coily",
        }
    }
}

impl fmt::Display for HairType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HairType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "straight" => Ok(HairType::Straight),
            "wavy" => Ok(HairType::Wavy),
            "curly" => Ok(HairType::Curly),
            "coily" => Ok(HairType::Coily),
            other => Err(DomainError::NotFound(format!("unknown hair type: {other}"))),
        }
    }
}

/// Short description and care tip shown on a detection card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HaircareEntry {
    pub description: &'static str,
    pub care: &'static str,
}

impl HaircareEntry {
    pub const NOT_AVAILABLE: &'static str = "Information not available.";

    pub const UNAVAILABLE: HaircareEntry = HaircareEntry {
        description: Self::NOT_AVAILABLE,
        care: Self::NOT_AVAILABLE,
    };

    pub fn is_available(&self) -> bool {
        self != &Self::UNAVAILABLE
    }
}

static STRAIGHT: HaircareEntry = HaircareEntry {
    description: "Straight hair falls smoothly from root to tip and has a natural shine because scalp oil spreads easily. \
It goes flat quickly, lacks volume and struggles to hold waves or curls.",
    care: "Use a lightweight shampoo and avoid heavy products.",
};

static WAVY: HaircareEntry = HaircareEntry {
    description: "Wavy hair forms an \"S\" shape from the mid-lengths to the ends and usually has more natural volume than straight hair. \
It tangles easily, frizzes, and the wave pattern can be inconsistent.",
    care: "Use a sulfate-free shampoo and a moisturising conditioner.",
};

static CURLY: HaircareEntry = HaircareEntry {
    description: "Curly hair has a clearly visible curl pattern, especially when dry. It can look straighter when wet and curls up again as it dries. \
This type tends to frizz, dry out, break and be hard to manage.",
    care: "Use the 'squish to condish' method and a microfiber towel.",
};

static COILY: HaircareEntry = HaircareEntry {
    description: "Coily hair has very tight curls shaped like small spirals or zigzags, with a coarse to very coarse texture. \
Although it looks thick it is fragile, tangles easily and is damaged by frequent combing or excess heat.",
    care: "Deep condition weekly and follow the LOC method.",
};

/// Card text for `label`, matched case-insensitively. Unknown labels get [`HaircareEntry::UNAVAILABLE`].
pub fn lookup(label: &str) -> &'static HaircareEntry {
    match label.parse::<HairType>() {
        Ok(kind) => entry(kind),
        Err(_) => &HaircareEntry::UNAVAILABLE,
    }
}

pub fn entry(kind: HairType) -> &'static HaircareEntry {
    match kind {
        HairType::Straight => &STRAIGHT,
        HairType::Wavy => &WAVY,
        HairType::Curly => &CURLY,
        HairType::Coily => &COILY,
    }
}

/// TikTok tutorial id per hair type.
pub fn video_id(label: &str) -> Option<&'static str> {
    let kind = label.parse::<HairType>().ok()?;
    Some(match kind {
        HairType::Straight => "7287618275112996102",
        HairType::Wavy => "7497634254172458247",
        HairType::Curly => "7425542102844476678",
        HairType::Coily => "7258012818312809774",
    })
}

pub fn video_embed_url(label: &str) -> Option<String> {
    video_id(label).map(|id| format!("https://www.tiktok.com/embed/{id}"))
}

/// Long-form content for the hair type information page.
#[derive(Debug, Clone, Serialize)]
pub struct HairTypeProfile {
    pub hair_type: HairType,
    pub title: &'static str,
    pub style_name: &'static str,
    pub image: &'static str,
    pub description: &'static str,
    pub drawbacks: &'static [&'static str],
    pub care: &'static [&'static str],
    pub styling: &'static [&'static str],
}

static PROFILES: [HairTypeProfile; 4] = [
    HairTypeProfile {
        hair_type: HairType::Straight,
        title: "Straight Hair",
        style_name: "Straight",
        image: "img/straight1.png",
        description: "Straight strands fall smoothly from root to tip with a natural shine, since scalp oil spreads along them easily. \
They tend to go flat, lack volume and have trouble holding wavy or curly styles.",
        drawbacks: &[
            "Can look flat and lack volume.",
            "Picks up pollution and turns dull quickly without proper care.",
        ],
        care: &[
            "Use a light shampoo that does not weigh hair down.",
            "Use a one-minute conditioner aimed at hair fall to reduce shedding.",
            "Do a weekly hair growth creambath to keep roots strong.",
        ],
        styling: &[
            "Apply dry shampoo at the roots for extra volume.",
            "Wave irons, hot rollers or sea salt spray help build texture.",
            "Use a light mousse for volume that lasts.",
        ],
    },
    HairTypeProfile {
        hair_type: HairType::Wavy,
        title: "Wavy Hair",
        style_name: "Wavy",
        image: "img/wavy1.png",
        description: "Wavy hair forms an \"S\" shape from the mid-lengths to the ends and carries more natural volume than straight hair. \
It tangles easily, frizzes, and the waves can be inconsistent.",
        drawbacks: &[],
        care: &[
            "Use products with a light moisturising formula.",
            "After washing, use an intensive damage treatment conditioner to smooth and hydrate.",
            "Do a weekly creambath to nourish and lock in moisture.",
        ],
        styling: &[
            "Scrunch or plop while hair is half dry.",
            "Dry with a diffuser so the waves form naturally.",
            "Add sea salt spray or a light mousse for lasting waves.",
        ],
    },
    HairTypeProfile {
        hair_type: HairType::Curly,
        title: "Curly Hair",
        style_name: "Curly",
        image: "img/curly1.png",
        description: "Curly hair shows a clear curl pattern, especially when dry. Wet, it can look straighter but curls back as it dries. \
It tends to frizz, dry out, break and resist styling.",
        drawbacks: &[],
        care: &[
            "Use a shampoo with argan oil and vitamin E.",
            "Condition regularly to keep the curls moisturised.",
            "Apply a leave-in conditioner after washing.",
            "Avoid products with silicones and sulfates.",
            "Avoid combing and tying the hair too often.",
        ],
        styling: &[
            "Use rake and shake or finger coiling with leave-in and curl cream on damp hair.",
            "Diffuse on low heat to keep the curl shape.",
            "Styling gel helps the definition last longer.",
        ],
    },
    HairTypeProfile {
        hair_type: HairType::Coily,
        title: "Coily Hair",
        style_name: "Coily",
        image: "img/coily1.png",
        description: "Coily hair has very tight spiral or zigzag curls with a coarse to very coarse texture. \
Although it looks thick it is very fragile, tangles easily and is damaged by frequent combing or heat.",
        drawbacks: &[
            "Vulnerable to heat and chemical damage.",
            "Tangles and breaks easily without gentle care.",
        ],
        care: &[
            "Use leave-in conditioner and deep conditioning masks.",
            "Use a repairing shampoo and conditioner.",
            "Avoid frequent combing and use products that nourish from root to tip.",
        ],
        styling: &[
            "Wear protective styles such as twists, bantu knots or box braids.",
            "Twist outs and braid outs suit a natural look.",
            "Style with fingers or a wide-tooth comb so the texture is not damaged.",
        ],
    },
];

pub fn profiles() -> &'static [HairTypeProfile] {
    &PROFILES
}

pub fn profile(kind: HairType) -> &'static HairTypeProfile {
    &PROFILES[HairType::ALL.iter().position(|k| *k == kind).unwrap_or_default()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_entry_video_and_profile() {
        for kind in HairType::ALL {
            assert!(lookup(kind.as_str()).is_available());
            assert!(video_id(kind.as_str()).is_some());
            assert_eq!(profile(kind).hair_type, kind);
        }
    }

    #[test]
    fn hair_type_parse_ignores_case_and_padding() {
        assert_eq!(" Coily ".parse::<HairType>().unwrap(), HairType::Coily);
        assert!("frizzy".parse::<HairType>().is_err());
    }

    #[test]
    fn embed_url_is_empty_for_unknown() {
        assert_eq!(
            video_embed_url("WAVY").as_deref(),
            Some("https://www.tiktok.com/embed/7497634254172458247")
        );
        assert!(video_embed_url("bald").is_none());
    }
}
