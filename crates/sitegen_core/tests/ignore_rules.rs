use sitegen_core::IgnoreRules;

fn rules(patterns: &[&str]) -> IgnoreRules {
    IgnoreRules::new(patterns).unwrap()
}

#[test]
fn separator_style_does_not_change_result() {
    let cases = [
        ("**/*.map", "js\\vendor\\app.js.map"),
        ("css/*.scss", "css\\site.scss"),
        ("_content/**", "_content\\lib\\x.js"),
        ("img/?.png", "img\\a.png"),
        ("docs/*.md", "docs\\nested\\a.md"),
    ];
    for (pattern, windows_path) in cases {
        let rules = rules(&[pattern]);
        let unix_path = windows_path.replace('\\', "/");
        assert_eq!(
            rules.is_ignored(windows_path),
            rules.is_ignored(&unix_path),
            "pattern {pattern} disagrees on {windows_path}"
        );
    }
}

#[test]
fn single_star_stays_inside_one_segment() {
    let rules = rules(&["css/*.scss"]);
    assert!(rules.is_ignored("css/site.scss"));
    assert!(!rules.is_ignored("css/partials/_vars.scss"));
    assert!(!rules.is_ignored("site.scss"));
}

#[test]
fn double_star_matches_any_depth_including_zero() {
    let rules = rules(&["**/*.map"]);
    assert!(rules.is_ignored("app.js.map"));
    assert!(rules.is_ignored("js/app.js.map"));
    assert!(rules.is_ignored("js/vendor/deep/app.js.map"));
    assert!(!rules.is_ignored("js/app.js"));

    let rules = rules_for_dir();
    assert!(rules.is_ignored("drafts/a.html"));
    assert!(rules.is_ignored("drafts/2024/b.html"));
    assert!(!rules.is_ignored("published/a.html"));
}

fn rules_for_dir() -> IgnoreRules {
    rules(&["drafts/**"])
}

#[test]
fn question_mark_matches_one_non_separator_char() {
    let rules = rules(&["img/?.png"]);
    assert!(rules.is_ignored("img/a.png"));
    assert!(!rules.is_ignored("img/ab.png"));
    assert!(!rules.is_ignored("img//.png"));
}

#[test]
fn matching_is_case_insensitive_and_ignores_leading_slash() {
    let rules = rules(&["/Secrets/*.TXT"]);
    assert!(rules.is_ignored("secrets/keys.txt"));
    assert!(rules.is_ignored("/SECRETS/keys.txt"));
    assert!(rules.is_ignored("./secrets/keys.txt"));
}

#[test]
fn regex_metacharacters_are_literal() {
    let rules = rules(&["a+b/(x).css"]);
    assert!(rules.is_ignored("a+b/(x).css"));
    assert!(!rules.is_ignored("aab/x.css"));
}

#[test]
fn matching_pattern_reports_the_first_hit() {
    let rules = rules(&["*.txt", "**/*.txt"]);
    assert_eq!(rules.matching_pattern("notes.txt"), Some("*.txt"));
    assert_eq!(rules.matching_pattern("a/notes.txt"), Some("**/*.txt"));
    assert_eq!(rules.matching_pattern("a/notes.md"), None);
}

#[test]
fn empty_rules_ignore_nothing() {
    let rules = IgnoreRules::new(Vec::<String>::new()).unwrap();
    assert!(rules.is_empty());
    assert!(!rules.is_ignored("anything"));
}
