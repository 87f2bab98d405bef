//! Food icon catalog and the icon suggestion capability.
//!
//! Icon suggestion is strictly opportunistic: a classifier that cannot come
//! up with anything (or fails internally) returns `None`, and callers fall
//! back to the default icon. It must never block or fail an item save.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Available food icons, named after their asset files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FoodIcon {
    Amphora,
    Apple,
    Banana,
    Barrel,
    Bean,
    Beef,
    Beer,
    BottleWine,
    Cake,
    CakeSlice,
    Candy,
    CandyCane,
    Carrot,
    ChefHat,
    Cherry,
    Citrus,
    Coffee,
    Cookie,
    CookingPot,
    Croissant,
    CupSoda,
    Dessert,
    Donut,
    Drumstick,
    Egg,
    EggFried,
    Fish,
    GlassWater,
    Grape,
    Ham,
    Hamburger,
    HandPlatter,
    Hop,
    IceCreamBowl,
    IceCreamCone,
    LeafyGreen,
    Lollipop,
    Martini,
    Microwave,
    Milk,
    Nut,
    Pizza,
    Popcorn,
    Popsicle,
    Refrigerator,
    Salad,
    Sandwich,
    Shell,
    Snail,
    Soup,
    Torus,
    Utensils,
    UtensilsCrossed,
    Vegan,
    Wheat,
    Wine,
}

/// Every catalog entry, for pickers and exhaustive tests.
pub const ALL_ICONS: &[FoodIcon] = &[
    FoodIcon::Amphora,
    FoodIcon::Apple,
    FoodIcon::Banana,
    FoodIcon::Barrel,
    FoodIcon::Bean,
    FoodIcon::Beef,
    FoodIcon::Beer,
    FoodIcon::BottleWine,
    FoodIcon::Cake,
    FoodIcon::CakeSlice,
    FoodIcon::Candy,
    FoodIcon::CandyCane,
    FoodIcon::Carrot,
    FoodIcon::ChefHat,
    FoodIcon::Cherry,
    FoodIcon::Citrus,
    FoodIcon::Coffee,
    FoodIcon::Cookie,
    FoodIcon::CookingPot,
    FoodIcon::Croissant,
    FoodIcon::CupSoda,
    FoodIcon::Dessert,
    FoodIcon::Donut,
    FoodIcon::Drumstick,
    FoodIcon::Egg,
    FoodIcon::EggFried,
    FoodIcon::Fish,
    FoodIcon::GlassWater,
    FoodIcon::Grape,
    FoodIcon::Ham,
    FoodIcon::Hamburger,
    FoodIcon::HandPlatter,
    FoodIcon::Hop,
    FoodIcon::IceCreamBowl,
    FoodIcon::IceCreamCone,
    FoodIcon::LeafyGreen,
    FoodIcon::Lollipop,
    FoodIcon::Martini,
    FoodIcon::Microwave,
    FoodIcon::Milk,
    FoodIcon::Nut,
    FoodIcon::Pizza,
    FoodIcon::Popcorn,
    FoodIcon::Popsicle,
    FoodIcon::Refrigerator,
    FoodIcon::Salad,
    FoodIcon::Sandwich,
    FoodIcon::Shell,
    FoodIcon::Snail,
    FoodIcon::Soup,
    FoodIcon::Torus,
    FoodIcon::Utensils,
    FoodIcon::UtensilsCrossed,
    FoodIcon::Vegan,
    FoodIcon::Wheat,
    FoodIcon::Wine,
];

impl Default for FoodIcon {
    fn default() -> Self {
        Self::Utensils
    }
}

impl FoodIcon {
    /// Kebab-case icon name, matching the asset file stem.
    pub fn name(self) -> &'static str {
        match self {
            Self::Amphora => "amphora",
            Self::Apple => "apple",
            Self::Banana => "banana",
            Self::Barrel => "barrel",
            Self::Bean => "bean",
            Self::Beef => "beef",
            Self::Beer => "beer",
            Self::BottleWine => "bottle-wine",
            Self::Cake => "cake",
            Self::CakeSlice => "cake-slice",
            Self::Candy => "candy",
            Self::CandyCane => "candy-cane",
            Self::Carrot => "carrot",
            Self::ChefHat => "chef-hat",
            Self::Cherry => "cherry",
            Self::Citrus => "citrus",
            Self::Coffee => "coffee",
            Self::Cookie => "cookie",
            Self::CookingPot => "cooking-pot",
            Self::Croissant => "croissant",
            Self::CupSoda => "cup-soda",
            Self::Dessert => "dessert",
            Self::Donut => "donut",
            Self::Drumstick => "drumstick",
            Self::Egg => "egg",
            Self::EggFried => "egg-fried",
            Self::Fish => "fish",
            Self::GlassWater => "glass-water",
            Self::Grape => "grape",
            Self::Ham => "ham",
            Self::Hamburger => "hamburger",
            Self::HandPlatter => "hand-platter",
            Self::Hop => "hop",
            Self::IceCreamBowl => "ice-cream-bowl",
            Self::IceCreamCone => "ice-cream-cone",
            Self::LeafyGreen => "leafy-green",
            Self::Lollipop => "lollipop",
            Self::Martini => "martini",
            Self::Microwave => "microwave",
            Self::Milk => "milk",
            Self::Nut => "nut",
            Self::Pizza => "pizza",
            Self::Popcorn => "popcorn",
            Self::Popsicle => "popsicle",
            Self::Refrigerator => "refrigerator",
            Self::Salad => "salad",
            Self::Sandwich => "sandwich",
            Self::Shell => "shell",
            Self::Snail => "snail",
            Self::Soup => "soup",
            Self::Torus => "torus",
            Self::Utensils => "utensils",
            Self::UtensilsCrossed => "utensils-crossed",
            Self::Vegan => "vegan",
            Self::Wheat => "wheat",
            Self::Wine => "wine",
        }
    }

    /// Look up an icon by its kebab-case name.
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_ICONS.iter().copied().find(|icon| icon.name() == name)
    }

    /// Asset catalog path for this icon.
    pub fn asset_name(self) -> String {
        format!("FoodIcons/{}", self.name())
    }

    /// Human-readable name ("cup-soda" → "Cup Soda").
    pub fn display_name(self) -> String {
        self.name()
            .split('-')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Capability for suggesting a food icon from an item name.
///
/// Implementations are best-effort: `None` means "no suggestion", whether
/// because nothing matched or because the backing service failed. Errors are
/// never surfaced to the caller.
#[async_trait]
pub trait IconClassifier: Send + Sync {
    async fn suggest_icon(&self, food_name: &str) -> Option<FoodIcon>;
}

/// Deterministic keyword-table classifier.
///
/// Matches the lowercased item name against an ordered keyword table; the
/// first hit wins. The less obvious mappings (amphora for fermented dairy,
/// torus for ring-shaped baked goods, barrel for spices) come from the icon
/// set's own conventions.
#[derive(Debug, Default)]
pub struct KeywordClassifier;

/// Keyword table, checked in order. Specific terms come before generic ones
/// so "ice cream sandwich" resolves to ice cream rather than sandwich.
const KEYWORD_TABLE: &[(&str, FoodIcon)] = &[
    ("ice cream", FoodIcon::IceCreamBowl),
    ("yogurt", FoodIcon::Amphora),
    ("yoghurt", FoodIcon::Amphora),
    ("kefir", FoodIcon::Amphora),
    ("cheese", FoodIcon::Amphora),
    ("bagel", FoodIcon::Torus),
    ("donut", FoodIcon::Donut),
    ("doughnut", FoodIcon::Donut),
    ("sauce", FoodIcon::HandPlatter),
    ("dip", FoodIcon::HandPlatter),
    ("ketchup", FoodIcon::HandPlatter),
    ("mustard", FoodIcon::HandPlatter),
    ("seasoning", FoodIcon::Barrel),
    ("spice", FoodIcon::Barrel),
    ("pepper", FoodIcon::Barrel),
    ("soda", FoodIcon::CupSoda),
    ("juice", FoodIcon::CupSoda),
    ("cola", FoodIcon::CupSoda),
    ("water", FoodIcon::GlassWater),
    ("beer", FoodIcon::Beer),
    ("ale", FoodIcon::Hop),
    ("wine", FoodIcon::Wine),
    ("chicken", FoodIcon::Drumstick),
    ("turkey", FoodIcon::Drumstick),
    ("lettuce", FoodIcon::LeafyGreen),
    ("spinach", FoodIcon::LeafyGreen),
    ("kale", FoodIcon::LeafyGreen),
    ("shrimp", FoodIcon::Shell),
    ("oyster", FoodIcon::Shell),
    ("mussel", FoodIcon::Shell),
    ("clam", FoodIcon::Shell),
    ("escargot", FoodIcon::Snail),
    ("soup", FoodIcon::Soup),
    ("stew", FoodIcon::CookingPot),
    ("frozen", FoodIcon::Microwave),
    ("apple", FoodIcon::Apple),
    ("banana", FoodIcon::Banana),
    ("carrot", FoodIcon::Carrot),
    ("cherry", FoodIcon::Cherry),
    ("lemon", FoodIcon::Citrus),
    ("lime", FoodIcon::Citrus),
    ("orange", FoodIcon::Citrus),
    ("grape", FoodIcon::Grape),
    ("coffee", FoodIcon::Coffee),
    ("cookie", FoodIcon::Cookie),
    ("croissant", FoodIcon::Croissant),
    ("cake", FoodIcon::Cake),
    ("candy", FoodIcon::Candy),
    ("egg", FoodIcon::Egg),
    ("fish", FoodIcon::Fish),
    ("salmon", FoodIcon::Fish),
    ("tuna", FoodIcon::Fish),
    ("ham", FoodIcon::Ham),
    ("burger", FoodIcon::Hamburger),
    ("milk", FoodIcon::Milk),
    ("cream", FoodIcon::Milk),
    ("beef", FoodIcon::Beef),
    ("steak", FoodIcon::Beef),
    ("bean", FoodIcon::Bean),
    ("nut", FoodIcon::Nut),
    ("almond", FoodIcon::Nut),
    ("pizza", FoodIcon::Pizza),
    ("popcorn", FoodIcon::Popcorn),
    ("popsicle", FoodIcon::Popsicle),
    ("salad", FoodIcon::Salad),
    ("sandwich", FoodIcon::Sandwich),
    ("tofu", FoodIcon::Vegan),
    ("bread", FoodIcon::Wheat),
    ("flour", FoodIcon::Wheat),
    ("pasta", FoodIcon::Wheat),
    ("rice", FoodIcon::Wheat),
];

#[async_trait]
impl IconClassifier for KeywordClassifier {
    async fn suggest_icon(&self, food_name: &str) -> Option<FoodIcon> {
        let name = food_name.trim().to_lowercase();
        if name.is_empty() {
            return None;
        }

        let suggestion = KEYWORD_TABLE
            .iter()
            .find(|(keyword, _)| name.contains(keyword))
            .map(|(_, icon)| *icon);

        match suggestion {
            Some(icon) => debug!("suggested icon '{}' for '{food_name}'", icon.name()),
            None => debug!("no icon suggestion for '{food_name}'"),
        }
        suggestion
    }
}
