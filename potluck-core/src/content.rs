//! Static editorial content: news articles and the social gallery.

use serde::Serialize;
use utoipa::ToSchema;

pub const NEWS_PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NewsArticle {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub image: String,
    /// RFC 3339 publication timestamp.
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewsPage {
    pub news: Vec<NewsArticle>,
    pub total_pages: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GalleryEntry {
    pub id: i64,
    pub image: String,
    pub title: String,
    pub url: String,
}

// (title, summary, content, date)
const NEWS: &[(&str, &str, &str, &str)] = &[
    (
        "5 Essential Cooking Techniques for Perfect Dishes",
        "Discover the key methods to take your cooking skills to the next level.",
        "Cooking is both an art and a science. From mastering knife skills to perfecting pan sauces, these techniques form the foundation of any great dish. Learn how to apply them efficiently to elevate your everyday meals.",
        "2025-01-15T10:00:00Z",
    ),
    (
        "The Science of Baking: Achieving Fluffy Cakes & Crispy Cookies",
        "Baking is all about chemistry. Learn how to get consistent results.",
        "Understanding ratios, leavening agents, and oven temperatures is crucial for top-quality baked goods. Discover why precise measurements matter and how to troubleshoot common baking mishaps like sinking cakes or overcooked cookies.",
        "2025-01-10T12:30:00Z",
    ),
    (
        "Meal Prepping 101: Save Time & Eat Healthier",
        "Plan, prep, and cook your meals in advance for stress-free weekdays.",
        "Meal prepping is a lifesaver for busy people who still want homemade meals. Learn how to create balanced menus, store food safely, and maintain freshness throughout the week without compromising flavor or nutrients.",
        "2025-01-05T15:45:00Z",
    ),
    (
        "Cooking with Seasonal Ingredients: The Ultimate Guide",
        "Harness the peak flavors of each season for delicious recipes.",
        "Cooking with in-season produce not only boosts flavor but can also save money. This guide covers how to source the freshest ingredients, plus creative recipe ideas for each season, from spring peas to autumn squash.",
        "2025-12-20T09:15:00Z",
    ),
    (
        "Why Hydration Matters in the Kitchen",
        "Stay hydrated while cooking to keep energy levels high.",
        "Cooking can be surprisingly dehydrating. Standing near a hot stove or oven for hours drains your fluids. Learn practical tips for drinking enough water throughout your cooking session and how hydration affects taste perception.",
        "2025-12-10T14:00:00Z",
    ),
    (
        "From Pantry to Plate: Making the Most of Leftovers",
        "Transform yesterday's dinner into a brand-new dish.",
        "Leftover food is a hidden treasure. Discover how to reinvent leftover chicken into hearty soups or salads, turn stale bread into puddings or croutons, and reduce kitchen waste with smart storage and meal-planning techniques.",
        "2025-12-01T11:00:00Z",
    ),
    (
        "How to Stay Motivated in the Kitchen",
        "Rediscover joy and creativity when cooking feels like a chore.",
        "Cooking ruts happen to everyone. From trying new cuisines to enrolling in virtual cooking classes, explore practical ways to keep yourself inspired, break monotony, and fall in love with home-cooking all over again.",
        "2025-11-25T08:30:00Z",
    ),
    (
        "Are Kitchen Gadgets Worth It? What Every Cook Should Know",
        "Do air fryers, instant pots, and sous vide machines really help?",
        "Kitchen gadgets can simplify meal prep, but they can also clutter your cabinets. Discover which trending devices are genuinely useful, how they work, and whether they deserve a spot on your countertop.",
        "2025-11-15T14:20:00Z",
    ),
    (
        "Boost Your Morning Routine with Quick & Healthy Breakfasts",
        "Start your day off right with nutritious, easy-to-make meals.",
        "Busy mornings don't have to mean skipping breakfast. Learn how to prepare grab-and-go breakfasts, overnight oats, and smoothie packs that fuel your day without sacrificing taste or nutrition.",
        "2025-11-05T17:10:00Z",
    ),
    (
        "Why Everyone Should Learn Basic Knife Skills",
        "The foundation of cooking starts with proper knife handling.",
        "Knife skills drastically reduce prep time and enhance safety. From choosing the right blade to practicing essential cuts like julienne and chiffonade, this article breaks down how to handle knives confidently for all your culinary adventures.",
        "2025-10-30T13:45:00Z",
    ),
];

const GALLERY: &[&str] = &[
    "Freshly Baked Bread",
    "Delicious Homemade Pizza",
    "Colorful Veggie Salad",
    "Classic Spaghetti Carbonara",
    "Chocolate Cake Delight",
    "Hearty Breakfast Spread",
];

pub fn news_articles() -> Vec<NewsArticle> {
    NEWS.iter()
        .enumerate()
        .map(|(i, (title, summary, content, date))| {
            let id = i as i64 + 1;
            NewsArticle {
                id,
                title: title.to_string(),
                summary: summary.to_string(),
                content: content.to_string(),
                image: format!("/images/news/{}.jpg", id),
                date: date.to_string(),
            }
        })
        .collect()
}

pub fn news_article(id: i64) -> Option<NewsArticle> {
    news_articles().into_iter().find(|article| article.id == id)
}

/// One page of news. Pages start at 1; anything lower is treated as 1.
pub fn news_page(page: i64) -> NewsPage {
    let page = usize::try_from(page.max(1)).unwrap_or(usize::MAX);
    let all = news_articles();
    let total_pages = all.len().div_ceil(NEWS_PAGE_SIZE);

    NewsPage {
        news: all
            .into_iter()
            .skip((page - 1).saturating_mul(NEWS_PAGE_SIZE))
            .take(NEWS_PAGE_SIZE)
            .collect(),
        total_pages,
    }
}

pub fn gallery() -> Vec<GalleryEntry> {
    GALLERY
        .iter()
        .enumerate()
        .map(|(i, title)| {
            let id = i as i64 + 1;
            GalleryEntry {
                id,
                image: format!("/images/instagram/{}.jpg", id),
                title: title.to_string(),
                url: "https://instagram.com/".to_string(),
            }
        })
        .collect()
}
