use std::{collections::HashMap, path::Path};

use scriptum_pdf::{
    Error, ExportConfig, ExportFormat, Exporter, Labels, Language, ProjectDir, SectionSource,
};

fn text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Config pointing at an empty fonts directory, so every face falls back to
/// its Base-14 standard font.
fn config(fonts: &Path) -> ExportConfig {
    ExportConfig {
        fonts_dir: Some(fonts.to_path_buf()),
        ..ExportConfig::default()
    }
}

async fn project(root: &Path, sections: &[(&str, &str)]) {
    tokio::fs::create_dir_all(root).await.unwrap();
    for (id, content) in sections {
        tokio::fs::write(root.join(format!("{id}.txt")), content)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn blank_sections_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Roma__sceneggiatura");
    project(
        &root,
        &[
            ("concept", "<p> &nbsp; </p>"),
            ("scene", r#"<div class="scene-heading">int. cucina - notte</div>"#),
        ],
    )
    .await;

    let exporter = Exporter::new(
        ProjectDir::new(&root),
        Labels::new(Language::It),
        config(dir.path()),
    );
    let path = exporter
        .export_project(&["concept", "scene", "note"], ExportFormat::Pdf, None)
        .await
        .unwrap();

    assert_eq!(path, root.join("export_Roma.pdf"));
    let pdf = text(&std::fs::read(&path).unwrap());
    assert!(pdf.starts_with("%PDF-"));
    assert!(pdf.contains("/Count 1"));
    assert!(pdf.contains("(STESURA) Tj"));
    assert!(!pdf.contains("(CONCEPT) Tj"));
    assert!(pdf.contains("(Pagina 1) Tj"));
    assert!(pdf.contains("/Title (Roma)"));
}

#[tokio::test]
async fn nothing_to_export_page() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Vuoto__libro");
    project(&root, &[("capitoli", "")]).await;

    let exporter = Exporter::new(
        ProjectDir::new(&root),
        Labels::new(Language::En),
        config(dir.path()),
    );
    let path = exporter
        .export_project(&["capitoli", "note"], ExportFormat::Pdf, None)
        .await
        .unwrap();

    let pdf = text(&std::fs::read(path).unwrap());
    assert!(pdf.contains("/Count 1"));
    assert!(pdf.contains("(No content to export.) Tj"));
    assert!(pdf.contains("(Page 1) Tj"));
}

#[tokio::test]
async fn missing_fonts_fall_back_to_standard_fonts() {
    let dir = tempfile::tempdir().unwrap();
    let fonts = dir.path().join("fonts");
    tokio::fs::create_dir_all(&fonts).await.unwrap();
    tokio::fs::write(fonts.join("CourierPrime-Regular.ttf"), b"not a font")
        .await
        .unwrap();

    let mut sections = HashMap::new();
    sections.insert(
        "note".to_string(),
        "<p><b>Promemoria</b> per il <i>montaggio</i></p>".to_string(),
    );

    let out = dir.path().join("note.pdf");
    let exporter = Exporter::new(sections, Labels::new(Language::It), config(&fonts));
    let path = exporter
        .export_project(&["note"], ExportFormat::Pdf, Some(&out))
        .await
        .unwrap();

    assert_eq!(path, out);
    let pdf = text(&std::fs::read(&out).unwrap());
    assert!(pdf.contains("/BaseFont /Times-Bold"));
    assert!(pdf.contains("/BaseFont /Courier"));
    assert!(!pdf.contains("/FontFile2"));
    assert!(pdf.contains("/Title (Scriptum)"));
}

#[tokio::test]
async fn bundled_font_files_are_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let fonts = dir.path().join("fonts");
    tokio::fs::create_dir_all(&fonts).await.unwrap();
    let ttf = include_bytes!("fixtures/DejaVuSansMono.ttf");
    for name in ["CourierPrime-Regular.ttf", "CourierPrime-Bold.ttf"] {
        tokio::fs::write(fonts.join(name), ttf).await.unwrap();
    }

    let root = dir.path().join("Roma");
    project(
        &root,
        &[("scene", r#"<div class="scene-heading">int. cucina</div><div class="action">Piove.</div>"#)],
    )
    .await;

    let exporter = Exporter::new(ProjectDir::new(&root), Labels::default(), config(&fonts));
    let path = exporter.export_section("scene", None).await.unwrap();

    let pdf = text(&std::fs::read(path).unwrap());
    assert_eq!(pdf.matches("/FontFile2").count(), 2);
    assert_eq!(pdf.matches("/Subtype /TrueType").count(), 2);
    assert!(pdf.contains("/BaseFont /CourierPrime-Bold"));
    assert!(pdf.contains("/BaseFont /Times-Roman"));
    assert!(pdf.contains("(INT. CUCINA) Tj"));
    assert!(pdf.contains("(Piove.) Tj"));
}

#[tokio::test]
async fn unknown_section_fails_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Roma");
    project(&root, &[("note", "<p>x</p>")]).await;

    let out = dir.path().join("never").join("created.pdf");
    let exporter = Exporter::new(ProjectDir::new(&root), Labels::default(), config(dir.path()));
    let err = exporter
        .export_section("storyboard", Some(&out))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::SectionNotFound(id) if id == "storyboard"));
    assert!(!out.parent().unwrap().exists());
}

#[test]
fn only_pdf_format_is_accepted() {
    assert_eq!(" pdf ".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
    let err = "docx".parse::<ExportFormat>().unwrap_err();
    assert_eq!(err.to_string(), "unsupported export format: docx");
}

#[tokio::test]
async fn output_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Roma");
    project(&root, &[("personaggi", r#"[{"name": "Ada", "role": "protagonista"}]"#)]).await;

    let out = dir.path().join("a").join("b").join("personaggi.pdf");
    let exporter = Exporter::new(ProjectDir::new(&root), Labels::default(), config(dir.path()));
    let path = exporter.export_section("personaggi", Some(&out)).await.unwrap();

    assert_eq!(path, out);
    let pdf = text(&std::fs::read(&out).unwrap());
    assert!(pdf.contains("(PERSONAGGI) Tj"));
    assert!(pdf.contains("/Subject (Scriptum Export"));
}

#[tokio::test]
async fn in_memory_source_needs_an_output_path() {
    let dir = tempfile::tempdir().unwrap();
    let sections: HashMap<String, String> = HashMap::new();
    assert!(sections.default_export_dir().is_none());

    let exporter = Exporter::new(sections, Labels::default(), config(dir.path()));
    let err = exporter
        .export_project(&["note"], ExportFormat::Pdf, None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::MissingOutputPath));
}

#[tokio::test]
async fn book_projects_in_english_call_the_outline_a_chapter_breakdown() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("Saga__libro");
    project(&root, &[("scaletta", r#"[{"title": "Opening", "summary": "Storm"}]"#)]).await;

    let exporter = Exporter::new(
        ProjectDir::new(&root),
        Labels::new(Language::En),
        config(dir.path()),
    );
    let path = exporter.export_section("scaletta", None).await.unwrap();

    assert_eq!(path, root.join("scaletta_export.pdf"));
    let pdf = text(&std::fs::read(&path).unwrap());
    assert!(pdf.contains("(CHAPTER BREAKDOWN) Tj"));
}
