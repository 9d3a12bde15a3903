//! Row assembly for export consumers.
//!
//! Formatting to a concrete file format (spreadsheet, PDF, HTML) is the
//! [`DocumentWriter`] collaborator's job; this module only turns the result
//! shapes into plain rows, one per sheet line.

use rust_decimal::Decimal;

use crate::costing::PatientCostBreakdown;
use crate::models::{DateRange, ItemCategory, StaffRole};
use crate::reporting::CompanyReport;
use crate::salary::{SalaryStatement, StaffAttribution};

/// Consumer of plain tabular rows.
pub trait DocumentWriter {
    fn write_row(&mut self, cells: Vec<String>) -> anyhow::Result<()>;
}

/// `DocumentWriter` that collects rows in memory; used by tests and by
/// callers that post-process rows themselves.
#[derive(Debug, Default)]
pub struct RowBuffer {
    pub rows: Vec<Vec<String>>,
}

impl DocumentWriter for RowBuffer {
    fn write_row(&mut self, cells: Vec<String>) -> anyhow::Result<()> {
        self.rows.push(cells);
        Ok(())
    }
}

/// `$1,234.56`, negative amounts as `$-1,234.56`.
pub fn format_currency(amount: Decimal) -> String {
    let rendered = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match rendered.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rendered.as_str()),
    };
    let (int_part, frac_part) = digits.split_once('.').unwrap_or((digits, "00"));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("${sign}{grouped}.{frac_part}")
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

/// Salary sheet rows for one staff member and period.
pub fn salary_sheet(
    statement: &SalaryStatement,
    window: &DateRange,
    writer: &mut dyn DocumentWriter,
) -> anyhow::Result<()> {
    let title = match statement.role {
        StaffRole::Doctor => "Doctor Salary Sheet",
        StaffRole::Nurse { .. } => "Nurse Salary Sheet",
    };
    writer.write_row(row(&[title]))?;
    writer.write_row(Vec::new())?;
    writer.write_row(vec!["Name:".into(), statement.name.clone()])?;
    writer.write_row(vec![
        "Period:".into(),
        format!("{} to {}", window.from, window.to),
    ])?;
    writer.write_row(Vec::new())?;
    writer.write_row(vec![
        "Total Hours:".into(),
        format!("{:.2}", statement.total_hours),
    ])?;
    writer.write_row(vec![
        "Hourly Rate:".into(),
        format_currency(statement.hourly_rate),
    ])?;
    writer.write_row(vec![
        "Base Salary:".into(),
        format_currency(statement.base_salary),
    ])?;
    writer.write_row(vec![
        "Bonus from Interventions:".into(),
        format_currency(statement.total_bonus),
    ])?;
    writer.write_row(vec![
        "Total Salary:".into(),
        format_currency(statement.total_salary),
    ])?;

    writer.write_row(Vec::new())?;
    writer.write_row(row(&["Shifts"]))?;
    writer.write_row(row(&["Arrival", "Leave", "Patient", "Hours"]))?;
    for shift in &statement.shift_details {
        writer.write_row(vec![
            shift.arrival.format("%Y-%m-%d %H:%M:%S").to_string(),
            shift.leave.format("%Y-%m-%d %H:%M:%S").to_string(),
            shift.patient.clone().unwrap_or_else(|| "N/A".into()),
            format!("{:.2}", shift.hours),
        ])?;
    }

    writer.write_row(Vec::new())?;
    writer.write_row(row(&["Interventions"]))?;
    writer.write_row(row(&["Date", "Intervention", "Patient", "Bonus"]))?;
    for event in &statement.intervention_details {
        writer.write_row(vec![
            event.date.to_string(),
            event.intervention.clone(),
            event.patient.clone().unwrap_or_else(|| "N/A".into()),
            format_currency(event.bonus),
        ])?;
    }
    Ok(())
}

/// Cost sheet rows for one patient and period.
pub fn cost_sheet(
    breakdown: &PatientCostBreakdown,
    writer: &mut dyn DocumentWriter,
) -> anyhow::Result<()> {
    writer.write_row(row(&["Patient Cost Sheet"]))?;
    writer.write_row(Vec::new())?;
    writer.write_row(vec!["Patient Name:".into(), breakdown.name.clone()])?;
    writer.write_row(vec![
        "Admission Date:".into(),
        breakdown.admission_date.to_string(),
    ])?;
    writer.write_row(vec![
        "Discharge Date:".into(),
        breakdown
            .discharge_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "N/A".into()),
    ])?;
    writer.write_row(Vec::new())?;
    writer.write_row(row(&["Cost Breakdown:"]))?;

    writer.write_row(vec![
        format!("Stays ({} days):", breakdown.stay_lines.len()),
        format_currency(breakdown.stay_cost),
    ])?;
    if !breakdown.stay_lines.is_empty() {
        writer.write_row(row(&["  Date", "Care Level", "Cost"]))?;
        for stay in &breakdown.stay_lines {
            writer.write_row(vec![
                format!("  {}", stay.date),
                stay.care_level.clone(),
                format_currency(stay.daily_rate),
            ])?;
        }
    }
    writer.write_row(Vec::new())?;

    for category in ItemCategory::ALL {
        writer.write_row(vec![
            format!("{category}:"),
            format_currency(breakdown.item_costs.get(category)),
        ])?;
        let lines: Vec<_> = breakdown
            .item_lines
            .iter()
            .filter(|l| l.category == category)
            .collect();
        if !lines.is_empty() {
            writer.write_row(row(&["  Date", "Item", "Quantity", "Price", "Total"]))?;
            for line in lines {
                writer.write_row(vec![
                    format!("  {}", line.date),
                    line.item.clone(),
                    line.quantity.to_string(),
                    format_currency(line.unit_price),
                    format_currency(line.total),
                ])?;
            }
        }
        writer.write_row(Vec::new())?;
    }

    staff_section(writer, "Doctor", &breakdown.doctor_detail)?;
    staff_section(writer, "Nurse", &breakdown.nurse_detail)?;

    writer.write_row(vec![
        "Equipment Costs:".into(),
        format_currency(breakdown.equipment_cost),
    ])?;
    if !breakdown.equipment_lines.is_empty() {
        writer.write_row(row(&[
            "  Name",
            "Start Date",
            "End Date",
            "Days",
            "Daily Price",
            "Cost",
        ]))?;
        for line in &breakdown.equipment_lines {
            writer.write_row(vec![
                format!("  {}", line.equipment),
                line.start.to_string(),
                line.end.map(|d| d.to_string()).unwrap_or_else(|| "N/A".into()),
                line.days.to_string(),
                format_currency(line.daily_rate),
                format_currency(line.cost),
            ])?;
        }
    }
    writer.write_row(Vec::new())?;

    writer.write_row(vec![
        "Total Cost:".into(),
        format_currency(breakdown.total_cost),
    ])?;
    Ok(())
}

fn staff_section(
    writer: &mut dyn DocumentWriter,
    title: &str,
    detail: &StaffAttribution,
) -> anyhow::Result<()> {
    writer.write_row(vec![
        format!("{title} Costs:"),
        format_currency(detail.total_cost),
    ])?;
    if !detail.shift_lines.is_empty() {
        writer.write_row(vec![format!("  {title} Shifts")])?;
        writer.write_row(row(&["    Arrival", "Leave", title, "Hours", "Rate", "Cost"]))?;
        for line in &detail.shift_lines {
            writer.write_row(vec![
                format!("    {}", line.arrival.format("%Y-%m-%d %H:%M:%S")),
                line.leave.format("%Y-%m-%d %H:%M:%S").to_string(),
                line.staff_name.clone(),
                format!("{:.2}", line.hours),
                format_currency(line.hourly_rate),
                format_currency(line.cost),
            ])?;
        }
    }
    if !detail.intervention_lines.is_empty() {
        writer.write_row(vec![format!("  {title} Interventions")])?;
        writer.write_row(row(&["    Date", "Intervention", title, "Bonus"]))?;
        for line in &detail.intervention_lines {
            writer.write_row(vec![
                format!("    {}", line.date),
                line.intervention.clone(),
                line.staff_name.clone(),
                format_currency(line.bonus),
            ])?;
        }
    }
    writer.write_row(Vec::new())?;
    Ok(())
}

/// Company report rows for a period.
pub fn company_sheet(
    report: &CompanyReport,
    writer: &mut dyn DocumentWriter,
) -> anyhow::Result<()> {
    writer.write_row(row(&["Company Report"]))?;
    writer.write_row(Vec::new())?;
    writer.write_row(vec![
        "Period:".into(),
        format!("{} to {}", report.window.from, report.window.to),
    ])?;
    writer.write_row(Vec::new())?;
    writer.write_row(vec![
        "Total Patient Revenue:".into(),
        format_currency(report.total_patient_revenue),
    ])?;
    writer.write_row(vec![
        "Total Staff Cost:".into(),
        format_currency(report.total_staff_cost),
    ])?;
    writer.write_row(vec![
        "Pass-through Cost:".into(),
        format_currency(report.pass_through_cost),
    ])?;
    writer.write_row(vec![
        "Total Operational Cost:".into(),
        format_currency(report.total_operational_cost),
    ])?;
    writer.write_row(vec![
        "Net Profit:".into(),
        format_currency(report.net_profit),
    ])?;

    writer.write_row(Vec::new())?;
    writer.write_row(row(&["Doctor Costs"]))?;
    writer.write_row(row(&["Name", "Cost"]))?;
    for line in &report.per_doctor {
        writer.write_row(vec![line.name.clone(), format_currency(line.cost)])?;
    }

    writer.write_row(Vec::new())?;
    writer.write_row(row(&["Nurse Costs"]))?;
    writer.write_row(row(&["Name", "Level", "Cost"]))?;
    for line in &report.per_nurse {
        let level = match line.level {
            Some(crate::models::NurseLevel::Icu) => "ICU",
            Some(crate::models::NurseLevel::MediumIcu) => "Medium ICU",
            None => "",
        };
        writer.write_row(vec![
            line.name.clone(),
            level.to_string(),
            format_currency(line.cost),
        ])?;
    }

    writer.write_row(Vec::new())?;
    writer.write_row(row(&["Patient Revenues"]))?;
    writer.write_row(row(&["Name", "Revenue"]))?;
    for line in &report.per_patient {
        writer.write_row(vec![line.name.clone(), format_currency(line.revenue)])?;
    }
    Ok(())
}
