//! Marketing-site content.
//!
//! Everything here is fixed sample data: the charts and recommendation cards
//! on the landing page are previews, not user data.

use serde::Serialize;

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;

pub const PRODUCT_NAME: &str = "Healithm";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stat {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hero {
    pub headline: &'static str,
    pub copy: &'static str,
    pub primary_action: &'static str,
    pub secondary_action: &'static str,
    pub stats: Vec<Stat>,
    pub badge_title: &'static str,
    pub badge_detail: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub step: u8,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPreview {
    pub name: &'static str,
    pub calories: u32,
    pub protein_grams: u32,
    pub prep_minutes: u32,
    pub tags: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPreview {
    pub name: &'static str,
    pub duration_minutes: u32,
    pub calories: u32,
    pub difficulty: &'static str,
    pub exercises: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub heading: &'static str,
    pub meals: Vec<MealPreview>,
    pub workouts: Vec<WorkoutPreview>,
    pub insight: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightPoint {
    pub month: &'static str,
    pub weight: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct CaloriePoint {
    pub day: &'static str,
    pub consumed: u32,
    pub burned: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MacroShare {
    pub name: &'static str,
    /// Percent of daily intake.
    pub value: u32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryCard {
    pub title: &'static str,
    pub value: &'static str,
    pub detail: &'static str,
    pub progress: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPreview {
    pub heading: &'static str,
    pub cards: Vec<SummaryCard>,
    pub weight: Vec<WeightPoint>,
    pub calories: Vec<CaloriePoint>,
    pub macros: Vec<MacroShare>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToAction {
    pub headline: &'static str,
    pub copy: &'static str,
    pub benefits: Vec<&'static str>,
    pub fine_print: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkGroup {
    pub title: &'static str,
    pub links: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Footer {
    pub tagline: &'static str,
    pub groups: Vec<LinkGroup>,
    pub copyright: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingPage {
    pub product: &'static str,
    pub hero: Hero,
    pub features: Vec<Feature>,
    pub how_it_works: Vec<Step>,
    pub recommendations: Recommendations,
    pub dashboard: DashboardPreview,
    pub cta: CallToAction,
    pub footer: Footer,
}

/// Section names accepted by [`section`], in page order.
pub const SECTIONS: [&str; 7] = ["hero", "features", "how-it-works", "recommendations", "dashboard", "cta", "footer"];

/// One section of the page as JSON, or `None` for an unknown name.
#[must_use]
pub fn section(name: &str) -> Option<serde_json::Value> {
    let page = landing_page();
    let value = match name {
        "hero" => serde_json::to_value(page.hero),
        "features" => serde_json::to_value(page.features),
        "how-it-works" => serde_json::to_value(page.how_it_works),
        "recommendations" => serde_json::to_value(page.recommendations),
        "dashboard" => serde_json::to_value(page.dashboard),
        "cta" => serde_json::to_value(page.cta),
        "footer" => serde_json::to_value(page.footer),
        _ => return None,
    };
    value.ok()
}

#[must_use]
pub fn landing_page() -> LandingPage {
    LandingPage {
        product: PRODUCT_NAME,
        hero: hero(),
        features: features(),
        how_it_works: how_it_works(),
        recommendations: recommendations(),
        dashboard: dashboard(),
        cta: cta(),
        footer: footer(),
    }
}

fn hero() -> Hero {
    Hero {
        headline: "Your Personal Health Journey Starts Here",
        copy: "Healithm uses advanced AI to monitor, manage, and improve your overall well-being. \
               Get personalized insights, nutrition tracking, workout plans, and achieve your health goals faster.",
        primary_action: "Start Your Journey",
        secondary_action: "Learn More",
        stats: vec![
            Stat { value: "50K+", label: "Active Users" },
            Stat { value: "4.9/5", label: "User Rating" },
            Stat { value: "1M+", label: "Meals Tracked" },
        ],
        badge_title: "Daily Goal Achieved!",
        badge_detail: "8,542 steps today",
    }
}

fn features() -> Vec<Feature> {
    vec![
        Feature {
            title: "Calorie & Nutrition Tracker",
            description: "Track your daily meals, calories, and macros with our intelligent food database and barcode scanner.",
        },
        Feature {
            title: "Exercise Planner",
            description: "Get personalized workout plans tailored to your fitness level, goals, and available equipment.",
        },
        Feature {
            title: "Health Dashboard",
            description: "Monitor your progress with comprehensive reports on weight, body metrics, and fitness achievements.",
        },
        Feature {
            title: "AI-Driven Insights",
            description: "Receive smart recommendations for meals and workouts based on your habits and health data.",
        },
        Feature {
            title: "Goal Tracking",
            description: "Set custom health goals and get estimated timelines to achieve them based on your progress.",
        },
        Feature {
            title: "Progress Monitoring",
            description: "View detailed analytics of your physical progress, trends, and health improvements over time.",
        },
    ]
}

fn how_it_works() -> Vec<Step> {
    vec![
        Step {
            step: 1,
            title: "Create Your Profile",
            description: "Share your age, gender, height, weight, medical history, and lifestyle habits to get started.",
        },
        Step {
            step: 2,
            title: "Set Your Goals",
            description: "Define your health objectives - weight loss, muscle gain, improved fitness, or overall wellness.",
        },
        Step {
            step: 3,
            title: "Get AI Insights",
            description: "Receive personalized meal plans, workout routines, and health recommendations powered by AI.",
        },
        Step {
            step: 4,
            title: "Track & Achieve",
            description: "Monitor your progress with detailed analytics and estimated timelines to reach your targets.",
        },
    ]
}

fn recommendations() -> Recommendations {
    Recommendations {
        heading: "Personalized Just for You",
        meals: vec![
            MealPreview {
                name: "Grilled Salmon Bowl",
                calories: 450,
                protein_grams: 35,
                prep_minutes: 25,
                tags: vec!["High Protein", "Low Carb"],
            },
            MealPreview {
                name: "Quinoa Power Salad",
                calories: 380,
                protein_grams: 15,
                prep_minutes: 15,
                tags: vec!["Vegetarian", "Fiber Rich"],
            },
        ],
        workouts: vec![
            WorkoutPreview {
                name: "Full Body HIIT",
                duration_minutes: 30,
                calories: 350,
                difficulty: "Intermediate",
                exercises: 8,
            },
            WorkoutPreview {
                name: "Upper Body Strength",
                duration_minutes: 45,
                calories: 280,
                difficulty: "Advanced",
                exercises: 10,
            },
        ],
        insight: "Based on your progress, you're on track to reach your target weight of 70kg in approximately 8 weeks. \
                  Keep up the great work!",
    }
}

fn dashboard() -> DashboardPreview {
    let weight = [("Jan", 82), ("Feb", 80), ("Mar", 78), ("Apr", 77), ("May", 75), ("Jun", 74)]
        .into_iter()
        .map(|(month, weight)| WeightPoint { month, weight })
        .collect();
    let calories = [
        ("Mon", 2100, 2400),
        ("Tue", 1900, 2200),
        ("Wed", 2200, 2500),
        ("Thu", 2000, 2300),
        ("Fri", 2300, 2600),
        ("Sat", 2400, 2700),
        ("Sun", 2100, 2400),
    ]
    .into_iter()
    .map(|(day, consumed, burned)| CaloriePoint { day, consumed, burned })
    .collect();

    DashboardPreview {
        heading: "Your Personal Health Dashboard",
        cards: vec![
            SummaryCard { title: "Daily Calories", value: "2,100", detail: "300 below target", progress: 70 },
            SummaryCard { title: "Steps Today", value: "8,542", detail: "+1,542 above goal", progress: 85 },
            SummaryCard { title: "Water Intake", value: "6/8 cups", detail: "2 cups remaining", progress: 75 },
        ],
        weight,
        calories,
        macros: vec![
            MacroShare { name: "Protein", value: 30, color: "#10b981" },
            MacroShare { name: "Carbs", value: 45, color: "#3b82f6" },
            MacroShare { name: "Fats", value: 25, color: "#f59e0b" },
        ],
    }
}

fn cta() -> CallToAction {
    CallToAction {
        headline: "Ready to Transform Your Health?",
        copy: "Join thousands of users who have already started their journey to a healthier life",
        benefits: vec![
            "AI-powered personalized recommendations",
            "Comprehensive nutrition and fitness tracking",
            "Real-time progress monitoring",
            "Expert workout plans and meal suggestions",
            "Health insights and goal timelines",
        ],
        fine_print: "No credit card required • 14-day free trial • Cancel anytime",
    }
}

fn footer() -> Footer {
    Footer {
        tagline: "Your AI-powered personal health and fitness platform for a better, healthier life.",
        groups: vec![
            LinkGroup { title: "Product", links: vec!["Features", "Pricing", "FAQ", "Testimonials"] },
            LinkGroup { title: "Company", links: vec!["About Us", "Careers", "Blog", "Press Kit"] },
            LinkGroup {
                title: "Support",
                links: vec!["Help Center", "Contact Us", "Privacy Policy", "Terms of Service"],
            },
        ],
        copyright: "© 2025 Healithm. All rights reserved.",
    }
}
