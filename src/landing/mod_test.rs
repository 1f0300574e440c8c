use super::*;

#[test]
fn page_has_all_sections_in_expected_sizes() {
    let page = landing_page();
    assert_eq!(page.product, "Healithm");
    assert_eq!(page.features.len(), 6);
    assert_eq!(page.how_it_works.len(), 4);
    assert_eq!(page.recommendations.meals.len(), 2);
    assert_eq!(page.recommendations.workouts.len(), 2);
    assert_eq!(page.cta.benefits.len(), 5);
    assert_eq!(page.footer.groups.len(), 3);
}

#[test]
fn steps_are_numbered_in_order() {
    let steps: Vec<u8> = landing_page().how_it_works.iter().map(|s| s.step).collect();
    assert_eq!(steps, vec![1, 2, 3, 4]);
}

#[test]
fn dashboard_series_cover_six_months_and_a_week() {
    let dashboard = landing_page().dashboard;
    assert_eq!(dashboard.weight.first().map(|p| p.weight), Some(82));
    assert_eq!(dashboard.weight.last().map(|p| p.month), Some("Jun"));
    assert_eq!(dashboard.calories.len(), 7);
    assert!(dashboard.calories.iter().all(|d| d.burned > d.consumed));
}

#[test]
fn macro_split_sums_to_one_hundred() {
    let total: u32 = landing_page().dashboard.macros.iter().map(|m| m.value).sum();
    assert_eq!(total, 100);
}

#[test]
fn every_listed_section_resolves() {
    for name in SECTIONS {
        assert!(section(name).is_some(), "missing section {name}");
    }
    assert!(section("pricing").is_none());
}

#[test]
fn sections_serialize_camel_case() {
    let hero = section("hero").unwrap();
    assert_eq!(hero["primaryAction"], "Start Your Journey");
    assert_eq!(hero["badgeDetail"], "8,542 steps today");

    let recs = section("recommendations").unwrap();
    assert_eq!(recs["meals"][0]["proteinGrams"], 35);
    assert_eq!(recs["workouts"][1]["durationMinutes"], 45);
}
