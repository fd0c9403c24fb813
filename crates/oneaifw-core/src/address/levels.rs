//! Chinese address level hierarchy (spec §4.F) and the static tables that
//! drive tokenization: suffixes, gazetteers, and the privacy-threshold
//! bitset helper.

/// Address levels, L1 (room) through L11 (country). Rank order matters:
/// larger rank is coarser, and growth/whitelist rules are phrased in terms
/// of rank arithmetic (`rank(candidate) + 1 == min_rank_so_far`, etc).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    L1 = 1,
    L2 = 2,
    L3 = 3,
    L4 = 4,
    L5 = 5,
    L6 = 6,
    L7 = 7,
    L8 = 8,
    L9 = 9,
    L10 = 10,
    L11 = 11,
}

impl Level {
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub fn from_rank(rank: u8) -> Option<Level> {
        match rank {
            1 => Some(Level::L1),
            2 => Some(Level::L2),
            3 => Some(Level::L3),
            4 => Some(Level::L4),
            5 => Some(Level::L5),
            6 => Some(Level::L6),
            7 => Some(Level::L7),
            8 => Some(Level::L8),
            9 => Some(Level::L9),
            10 => Some(Level::L10),
            11 => Some(Level::L11),
            _ => None,
        }
    }

    /// Priority order for tokenization: country is tried first, room last.
    pub const PRIORITY: [Level; 11] = [
        Level::L11,
        Level::L10,
        Level::L9,
        Level::L8,
        Level::L7,
        Level::L6,
        Level::L5,
        Level::L4,
        Level::L3,
        Level::L2,
        Level::L1,
    ];
}

/// A bitset over the 11 address levels (bit `n-1` for `Ln`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelBits(u16);

impl LevelBits {
    #[must_use]
    pub fn new() -> LevelBits {
        LevelBits(0)
    }

    pub fn set(&mut self, level: Level) {
        self.0 |= 1 << (level.rank() - 1);
    }

    #[must_use]
    pub fn contains(self, level: Level) -> bool {
        self.0 & (1 << (level.rank() - 1)) != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Lowest (finest-grained) rank present in the set, used by the score
    /// formula (spec §4.F step 5).
    #[must_use]
    pub fn lowest_rank(self) -> Option<u8> {
        (1..=11).find(|&rank| self.contains(Level::from_rank(rank).unwrap()))
    }

    /// Highest rank present, used by the left-extension bound
    /// (`max_rank_so_far`).
    #[must_use]
    pub fn highest_rank(self) -> Option<u8> {
        (1..=11).rev().find(|&rank| self.contains(Level::from_rank(rank).unwrap()))
    }

    /// Privacy threshold predicate (spec §4.F step 4 / §8 property 7):
    /// `L5 ∈ bits ∨ (L4 ∈ bits ∧ (L2 ∈ bits ∨ L1 ∈ bits))`.
    #[must_use]
    pub fn meets_privacy_threshold(self) -> bool {
        self.contains(Level::L5) || (self.contains(Level::L4) && (self.contains(Level::L2) || self.contains(Level::L1)))
    }
}

/// Heavy separators that bound a backward boundary walk.
pub const HEAVY_SEPARATORS: &[char] =
    &['。', '!', '！', '?', '？', ';', '；', ':', '：', '、', '(', '（', ')', '）', '/', '\\', '|', '\n', '\r'];

#[must_use]
pub fn is_heavy_separator(c: char) -> bool {
    HEAVY_SEPARATORS.contains(&c)
}

/// "ASCII-light" characters are plain spaces/punctuation that are skipped
/// (not counted against the character budget) during a backward boundary
/// walk, but do not themselves terminate the walk.
#[must_use]
pub fn is_ascii_light(c: char) -> bool {
    c.is_ascii() && !c.is_ascii_alphanumeric()
}

/// L11 country/region gazetteer (exact-phrase match, longest-first so
/// "中国" doesn't shadow a longer compound name sharing the prefix).
pub const COUNTRY_NAMES: &[&str] = &[
    "中华人民共和国",
    "中国",
    "香港特别行政区",
    "香港",
    "澳门特别行政区",
    "澳门",
    "台湾",
    "美国",
    "日本",
    "英国",
    "法国",
    "德国",
    "加拿大",
    "澳大利亚",
    "新加坡",
    "韩国",
];

/// L10 province/region exact names (tried before the suffix fallback below
/// so the backward boundary walk stops at the real province-name length
/// instead of the flat `max_chars_for(L10)` budget).
pub const PROVINCE_NAMES: &[&str] = &[
    "黑龙江省",
    "内蒙古自治区",
    "广西壮族自治区",
    "宁夏回族自治区",
    "新疆维吾尔自治区",
    "西藏自治区",
    "河北省",
    "山西省",
    "辽宁省",
    "吉林省",
    "江苏省",
    "浙江省",
    "安徽省",
    "福建省",
    "江西省",
    "山东省",
    "河南省",
    "湖北省",
    "湖南省",
    "广东省",
    "海南省",
    "四川省",
    "贵州省",
    "云南省",
    "陕西省",
    "甘肃省",
    "青海省",
    "台湾省",
    "香港特别行政区",
    "澳门特别行政区",
];

/// L10 province suffixes (fallback when the exact name above isn't in the
/// gazetteer).
pub const PROVINCE_SUFFIXES: &[&str] = &["特别行政区", "自治区", "自治州", "省", "盟", "地区"];

/// L9 city suffix. Excluded when immediately preceded by "城" (forms the
/// common noun "城市", not an admin city name).
pub const CITY_SUFFIX: &str = "市";
pub const CITY_SUFFIX_EXCLUDE_PRECEDING: &str = "城";

/// L8 district suffixes and named districts.
pub const DISTRICT_SUFFIXES: &[&str] = &["区", "區", "县", "縣", "旗"];
pub const DISTRICT_NAMES: &[&str] = &["新界", "九龙", "九龍"];

/// L7 township suffixes and named areas.
pub const TOWNSHIP_SUFFIXES: &[&str] = &["开发区", "科技园", "街道", "镇", "鎮", "乡", "鄉"];
pub const TOWNSHIP_NAMES: &[&str] = &["铜锣湾", "旺角", "尖沙咀"];

/// L6 road suffixes, longest-first so e.g. "环路" wins over a bare "路".
pub const ROAD_SUFFIXES: &[&str] = &[
    "环路", "环线", "大道", "大街", "道中", "道东", "道西", "道南", "道北", "胡同", "路", "街", "巷", "弄", "里", "道", "段", "期",
];

/// L4 POI suffixes. "城" is excluded when followed by one of
/// `POI_CITY_EXCLUDE_FOLLOWING` (demoted to an admin name, e.g. "盐城市").
pub const POI_SUFFIXES: &[&str] = &[
    "购物公园", "购物艺术馆", "广场", "花苑", "花园", "天地", "大厦", "大楼", "城", "苑", "港", "塔", "廊", "坊", "府",
];
pub const POI_CITY_SUFFIX: &str = "城";
pub const POI_CITY_EXCLUDE_FOLLOWING: &[char] = &['区', '县', '市'];

/// L3 building suffixes (digits/ASCII letters immediately precede).
pub const BUILDING_SUFFIXES: &[&str] = &["号楼", "号館", "號樓", "館", "栋", "棟", "幢", "座"];
/// Bare suffix chained directly after an L5 house-number token ending in
/// "号"/"號" (see `fuser`'s house->building chaining rule).
pub const BUILDING_CHAIN_SUFFIXES: &[&str] = &["楼", "館", "馆"];

/// L2 floor suffixes (digits precede), plus the `F`+digits ASCII form.
pub const FLOOR_SUFFIXES: &[&str] = &["层", "層", "楼", "樓"];

/// L1 unit/room suffixes (digits/letters precede), plus the standalone
/// "之"+digits tail form.
pub const UNIT_SUFFIXES: &[&str] = &["单元", "室", "房"];
pub const UNIT_TAIL_MARKER: char = '之';

/// Per-level maximum character span for a backward boundary walk.
#[must_use]
pub fn max_chars_for(level: Level) -> usize {
    match level {
        Level::L11 => 16,
        Level::L10 => 24,
        Level::L9 => 24,
        Level::L8 => 24,
        Level::L7 => 28,
        Level::L6 => 32,
        Level::L5 => 12,
        Level::L4 => 24,
        Level::L3 => 12,
        Level::L2 => 8,
        Level::L1 => 12,
    }
}
