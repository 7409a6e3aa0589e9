//! 每周期诊断汇总表（仅用于日志展示）。

use crate::poller::DeviceReport;
use domain::{OutletDetail, OutletState};

const HEADERS: [&str; 11] = [
    "No", "Model", "Name", "Brand", "Status", "Volt", "Amp", "Watt", "kWh", "Outlets", "Error",
];
const ERROR_WIDTH: usize = 80;

/// 数值格式化；非有限值显示为 `--`。
pub fn format_metric(value: f64, digits: usize) -> String {
    if value.is_finite() {
        format!("{:.*}", digits, value)
    } else {
        "--".to_string()
    }
}

/// `1:● 2:○ 3:-`
pub fn format_outlets(detail: &OutletDetail) -> String {
    detail
        .iter()
        .map(|(port, state)| {
            let symbol = match state {
                Some(OutletState::On) => '●',
                Some(OutletState::Off) => '○',
                None => '-',
            };
            format!("{}:{}", port, symbol)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() {
        "--".to_string()
    } else {
        value.to_string()
    }
}

fn row(index: usize, item: &DeviceReport) -> [String; 11] {
    let poll = &item.poll;
    [
        (index + 1).to_string(),
        or_dash(&poll.model),
        or_dash(&poll.name),
        or_dash(&poll.brand),
        poll.status.as_str().to_string(),
        format_metric(poll.voltage, 2),
        format_metric(poll.current, 2),
        format_metric(poll.power, 1),
        format_metric(poll.energy, 2),
        format_outlets(&item.normalized.outlet_detail),
        poll.error.chars().take(ERROR_WIDTH).collect(),
    ]
}

/// 渲染为等宽文本表格。
pub fn render_summary(devices: &[DeviceReport]) -> String {
    let rows: Vec<[String; 11]> = devices
        .iter()
        .enumerate()
        .map(|(index, item)| row(index, item))
        .collect();
    let mut widths = HEADERS.map(|header| header.chars().count());
    for cells in &rows {
        for (width, cell) in widths.iter_mut().zip(cells) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| {
                let pad = width - cell.chars().count();
                format!("{}{}", cell, " ".repeat(pad))
            })
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let mut out = vec![line(&header)];
    out.push(
        widths
            .iter()
            .map(|width| "-".repeat(*width))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.extend(rows.iter().map(|cells| line(cells)));
    out.join("\n")
}
