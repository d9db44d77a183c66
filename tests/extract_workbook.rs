use std::path::{Path, PathBuf};

use deposit_recon::models::HeaderSpec;
use deposit_recon::sheet::{RegionExtractor, ScanState};
use deposit_recon::CheckError;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

fn header() -> HeaderSpec {
    "定金（元）, 销售订单号, 专卖店, 订单时间 : 合计".parse().unwrap()
}

fn xlsx_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(format!("{name}.xlsx"))
}

/// 标题行 + 偏移两列的表头 + 两行数据 + 合计行
fn write_deposit_sheet(wb: &mut Workbook, name: &str, first_order: u32) {
    let date_fmt = Format::new().set_num_format("yyyy-mm-dd hh:mm:ss");
    let ws = wb.add_worksheet();
    ws.set_name(name).unwrap();

    ws.write_string(0, 0, "定金退还明细").unwrap();
    for (i, h) in ["定金（元）", "销售订单号", "专卖店", "订单时间"].iter().enumerate() {
        ws.write_string(2, 2 + i as u16, *h).unwrap();
    }

    let time = ExcelDateTime::from_ymd(2024, 3, 5)
        .unwrap()
        .and_hms(14, 30, 0)
        .unwrap();
    for r in 0..2u32 {
        let row = 3 + r;
        ws.write_number(row, 2, 100.5 + r as f64).unwrap();
        ws.write_string(row, 3, format!(" {} ", first_order + r)).unwrap();
        ws.write_string(row, 4, "一号店").unwrap();
        ws.write_datetime_with_format(row, 5, &time, &date_fmt).unwrap();
    }
    ws.write_string(5, 2, "合计").unwrap();
    ws.write_number(5, 3, 201.5).unwrap();
    ws.write_string(6, 2, "999").unwrap();
}

#[test]
fn extracts_offset_region_with_dates() {
    let dir = tempfile::tempdir().unwrap();
    let path = xlsx_path(dir.path(), "deposit");

    let mut wb = Workbook::new();
    write_deposit_sheet(&mut wb, "Sheet1", 1001);
    wb.save(&path).unwrap();

    let out = RegionExtractor::new(header()).extract_workbook(&path).unwrap();

    assert_eq!(out.final_state(), Some(ScanState::Done));
    assert_eq!(
        out.table.rows,
        vec![
            vec!["100.5", "1001", "一号店", "2024-03-05 14:30:00"],
            vec!["101.5", "1002", "一号店", "2024-03-05 14:30:00"],
        ]
    );
}

#[test]
fn first_completed_sheet_wins() {
    let dir = tempfile::tempdir().unwrap();
    let path = xlsx_path(dir.path(), "multi");

    let mut wb = Workbook::new();
    let cover = wb.add_worksheet();
    cover.set_name("说明").unwrap();
    cover.write_string(0, 0, "no table on this sheet").unwrap();
    write_deposit_sheet(&mut wb, "第一批", 2001);
    write_deposit_sheet(&mut wb, "第二批", 3001);
    wb.save(&path).unwrap();

    let out = RegionExtractor::new(header()).extract_workbook(&path).unwrap();

    let states: Vec<ScanState> = out.scans.iter().map(|s| s.state).collect();
    assert_eq!(states, vec![ScanState::SeekHeader, ScanState::Done]);
    let keys = out.table.column(1).unwrap();
    assert_eq!(keys, vec!["2001", "2002"]);
}

#[test]
fn missing_end_marker_still_returns_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = xlsx_path(dir.path(), "open");

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "A").unwrap();
    ws.write_string(0, 1, "B").unwrap();
    ws.write_string(1, 0, "1").unwrap();
    ws.write_string(1, 1, "2").unwrap();
    wb.save(&path).unwrap();

    let spec: HeaderSpec = "A, B : END".parse().unwrap();
    let out = RegionExtractor::new(spec).extract_workbook(&path).unwrap();
    assert!(out.is_unterminated());
    assert_eq!(out.table.rows, vec![vec!["1", "2"]]);
}

#[test]
fn no_matching_header_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = xlsx_path(dir.path(), "none");

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.write_string(0, 0, "X").unwrap();
    ws.write_string(0, 1, "Y").unwrap();
    wb.save(&path).unwrap();

    let err = RegionExtractor::new(header()).extract_workbook(&path).unwrap_err();
    assert!(matches!(err, CheckError::NoMatchingData { .. }));
}

#[test]
fn unreadable_file_is_a_workbook_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = xlsx_path(dir.path(), "missing");
    let err = RegionExtractor::new(header()).extract_workbook(&path).unwrap_err();
    assert!(matches!(err, CheckError::Workbook(_)));
}
