use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use photo_dup_rust::common::{MatchKind, Matcher};
use photo_dup_rust::{catalog, cli, config, export, logging, scanner};
use cli::Cli;
use config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);

    let config = cli.apply_to(Config::load().context("設定ファイルの読み込みに失敗")?);
    if cli.save_config {
        let config_path = Config::config_path()?;
        config.save_to(&config_path)?;
        println!("✔ 設定を保存しました: {}", config_path.display());
    }
    if cli.show_config {
        println!("設定:");
        println!("  キャッシュ: {}", config.cache_dir.display());
        println!("  レポート: {}", config.report_path.display());
        println!("  テンプレート: {}", config.template_path.display());
        println!("  サイズ索引キー: {}", config.size_tier_key);
        println!();
    }

    println!("🔍 photo-dup - 重複写真チェック\n");

    // 1. カタログ読み込み
    println!("[1/3] ライブラリを読み込み中...");
    let db_path = catalog::database_path(&cli.catalog_root);
    let index = catalog::load_catalog(&db_path)?;
    println!("✔ {}件のアセットを読み込み\n", index.len());

    // 2. スキャン
    println!("[2/3] フォルダをスキャン中...");
    let progress = ProgressBar::new(scanner::MAX_SCAN_FILES as u64);
    if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}") {
        progress.set_style(style);
    }
    let matcher = Matcher::new(config.size_tier_key);
    let report = scanner::scan_folder_with(
        &cli.target_dir,
        &index,
        &scanner::ExifExtractor,
        &matcher,
        |path, _| {
            progress.set_message(
                path.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
            );
            progress.inc(1);
        },
    )?;
    progress.finish_and_clear();
    println!("✔ {}枚を照合", report.processed);
    if report.limit_reached {
        println!("  上限 {} 枚に達したため残りは未処理", scanner::MAX_SCAN_FILES);
    }
    println!();

    // 3. レポート出力
    println!("[3/3] レポートを出力中...");
    std::fs::create_dir_all(&config.cache_dir)
        .with_context(|| format!("キャッシュフォルダを作成できません: {}", config.cache_dir.display()))?;
    let report_path = export::report_path_for(&config.report_path, "exact_matches.html");
    let options = export::ReportOptions {
        masters_root: catalog::masters_path(&cli.catalog_root),
        cache_dir: config.cache_dir.clone(),
        template: Some(config.template_path.clone()),
    };
    let rendered = export::render_report(&report.groups, &report_path, &options)
        .with_context(|| format!("レポートを書き出せません: {}", report_path.display()))?;
    println!("✔ レポート: {}", report_path.display());

    println!("\n結果:");
    for kind in [
        MatchKind::Exact,
        MatchKind::DiffDate,
        MatchKind::DiffName,
        MatchKind::SizeMatchOnly,
    ] {
        println!("  {}: {}件", kind.label(), report.groups.get(kind).len());
    }
    println!("  撮影日時なし: {}件", report.no_date.len());
    println!("  サイズのみ一致（複数候補）: {}件", report.ambiguous.len());
    println!("  読み込み失敗: {}件", report.unreadable.len());
    if !rendered.missing.is_empty() {
        println!("  ライブラリ側ファイル不明: {}件", rendered.missing.len());
    }

    println!("\n✅ 完了");
    Ok(())
}
