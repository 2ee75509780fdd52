//! Gallery document integration tests

use screpo_core::gallery::{build, scan_assets};
use screpo_test_utils::fixtures::TestFolder;

fn build_folder(folder: &TestFolder, title: &str) -> String {
    build(folder.images_dir(), folder.index_path(), title).expect("build gallery");
    folder.read_index()
}

#[test]
fn test_two_assets_scenario() {
    let folder = TestFolder::new();
    folder.add_image_at("shot2.jpg", 20);
    folder.add_image_at("shot1.png", 10);

    let html = build_folder(&folder, "My Title");

    assert!(html.contains("<h1>My Title</h1>"));
    assert_eq!(html.matches("<div>").count(), 2);
    let first = html.find(r#"src="img/shot1.png""#).expect("shot1 listed");
    let second = html.find(r#"src="img/shot2.jpg""#).expect("shot2 listed");
    assert!(first < second);
}

#[test]
fn test_build_is_idempotent() {
    let folder = TestFolder::new();
    folder.add_image_at("a.png", 1);
    folder.add_image_at("b.bmp", 2);

    let first = build_folder(&folder, "Same");
    let second = build_folder(&folder, "Same");
    assert_eq!(first, second);
}

#[test]
fn test_older_assets_come_first() {
    let folder = TestFolder::new();
    folder.add_image_at("c.png", 300);
    folder.add_image_at("a.png", 100);
    folder.add_image_at("b.png", 200);

    let names: Vec<String> = scan_assets(folder.images_dir())
        .unwrap()
        .into_iter()
        .map(|a| a.file_name)
        .collect();
    assert_eq!(names, ["a.png", "b.png", "c.png"]);
}

#[test]
fn test_filtering_by_extension() {
    let folder = TestFolder::new();
    for (i, name) in ["a.PNG", "b.jpg", "c.JPEG", "d.Bmp", "notes.txt", "e.gif", "png"]
        .iter()
        .enumerate()
    {
        folder.add_image_at(name, i as u64);
    }
    std::fs::create_dir(folder.images_dir().join("nested.png")).unwrap();

    let html = build_folder(&folder, "Filter");

    for listed in ["a.PNG", "b.jpg", "c.JPEG", "d.Bmp"] {
        assert_eq!(html.matches(&format!(r#"src="img/{listed}""#)).count(), 1, "{listed}");
    }
    for skipped in ["notes.txt", "e.gif", "nested.png", r#"src="img/png""#] {
        assert!(!html.contains(skipped), "{skipped} should not be listed");
    }
    assert_eq!(html.matches("<div>").count(), 4);
}

#[test]
fn test_deleted_asset_disappears() {
    let folder = TestFolder::new();
    let gone = folder.add_image_at("gone.png", 1);
    folder.add_image_at("kept.png", 2);
    assert!(build_folder(&folder, "T").contains("gone.png"));

    std::fs::remove_file(gone).unwrap();
    let html = build_folder(&folder, "T");
    assert!(!html.contains("gone.png"));
    assert!(html.contains("kept.png"));
}

#[test]
fn test_markup_is_escaped() {
    let folder = TestFolder::new();
    folder.add_image_at(r#"a&b"c<d>.png"#, 1);

    let html = build_folder(&folder, r#"Tom & "Jerry" <script>"#);

    assert!(html.contains("<h1>Tom &amp; &quot;Jerry&quot; &lt;script&gt;</h1>"));
    assert!(html.contains("a&amp;b&quot;c&lt;d&gt;.png"));
    assert!(!html.contains("<script>"));
}

#[test]
fn test_summary_counts_assets() {
    let folder = TestFolder::new();
    folder.add_image_at("one.png", 1);

    let summary = build(folder.images_dir(), folder.index_path(), "T").unwrap();
    assert_eq!(summary.asset_count, 1);
    assert_eq!(summary.output_path, folder.index_path());
}
