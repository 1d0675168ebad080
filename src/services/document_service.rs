// src/services/document_service.rs

use std::path::PathBuf;

use chrono::Month;
use genpdf::{elements, style, Alignment, Element};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{common::error::AppError, models::payroll::PayrollDetail};

const NOT_AVAILABLE: &str = "N/A";

/// Parâmetros fixos do holerite (vindos da configuração).
#[derive(Debug, Clone)]
pub struct PayslipSettings {
    pub company_name: String,
    pub currency: String,
    pub font_dir: PathBuf,
    pub font_family: String,
}

/// Linha "rótulo: valor" do holerite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayslipLine {
    pub label: String,
    pub value: String,
}

impl PayslipLine {
    fn new(label: &str, value: impl Into<String>) -> Self {
        Self { label: label.to_owned(), value: value.into() }
    }
}

/// Layout do holerite já com os textos formatados. Não depende de fontes,
/// então pode ser testado sem renderizar o PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayslipDocument {
    pub filename: String,
    pub title: String,
    pub company_name: String,
    pub period: String,
    pub employee: Vec<PayslipLine>,
    pub earnings: Vec<PayslipLine>,
    pub deductions: Vec<PayslipLine>,
    pub totals: Vec<PayslipLine>,
}

/// `payslip_{código}_{mês}_{ano}.pdf`, com `unknown` quando o funcionário não resolve.
pub fn payslip_filename(detail: &PayrollDetail) -> String {
    // Vai para o Content-Disposition: só caracteres seguros
    let code: String = detail
        .employee_code
        .as_deref()
        .unwrap_or("unknown")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();

    format!("payslip_{}_{}_{}.pdf", code, detail.payroll.month, detail.payroll.year)
}

fn period_label(month: i32, year: i32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| format!("{} {}", m.name(), year))
        .unwrap_or_else(|| format!("{month}/{year}"))
}

impl PayslipDocument {
    pub fn build(detail: &PayrollDetail, settings: &PayslipSettings) -> Self {
        let payroll = &detail.payroll;
        let money = |value: Decimal| {
            let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            format!("{} {:.2}", settings.currency, rounded)
        };

        let employee = vec![
            PayslipLine::new("Employee Name", detail.employee_name.as_deref().unwrap_or(NOT_AVAILABLE)),
            PayslipLine::new("Employee Code", detail.employee_code.as_deref().unwrap_or(NOT_AVAILABLE)),
            PayslipLine::new(
                "Department",
                detail.department.map(|d| d.label()).unwrap_or(NOT_AVAILABLE),
            ),
            PayslipLine::new("Working Days", payroll.working_days.to_string()),
            PayslipLine::new("Present Days", payroll.present_days.to_string()),
            PayslipLine::new("Payment Status", format!("{:?}", payroll.payment_status)),
            PayslipLine::new(
                "Payment Date",
                payroll
                    .payment_date
                    .map(|d| d.format("%d/%m/%Y").to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.into()),
            ),
        ];

        let e = &payroll.earnings;
        let earnings = vec![
            PayslipLine::new("Basic Salary", money(e.basic_salary)),
            PayslipLine::new("HRA", money(e.hra)),
            PayslipLine::new("DA", money(e.da)),
            PayslipLine::new("Other Allowances", money(e.other_allowances)),
            PayslipLine::new("Bonus", money(e.bonus)),
            PayslipLine::new("Overtime", money(e.overtime)),
        ];

        let d = &payroll.deductions;
        let deductions = vec![
            PayslipLine::new("Provident Fund", money(d.pf)),
            PayslipLine::new("Tax", money(d.tax)),
            PayslipLine::new("Insurance", money(d.insurance)),
            PayslipLine::new("Loan Deduction", money(d.loan_deduction)),
            PayslipLine::new("Late Deduction", money(d.late_deduction)),
        ];

        let totals = vec![
            PayslipLine::new("Gross Salary", money(payroll.gross_salary)),
            PayslipLine::new("Total Deductions", money(payroll.total_deductions)),
            PayslipLine::new("Net Salary", money(payroll.net_salary)),
        ];

        Self {
            filename: payslip_filename(detail),
            title: "SALARY SLIP".into(),
            company_name: settings.company_name.clone(),
            period: period_label(payroll.month, payroll.year),
            employee,
            earnings,
            deductions,
            totals,
        }
    }
}

#[derive(Clone)]
pub struct DocumentService {
    settings: PayslipSettings,
}

impl DocumentService {
    pub fn new(settings: PayslipSettings) -> Self {
        Self { settings }
    }

    /// Monta o layout e renderiza o PDF numa thread de bloqueio.
    /// Retorna o nome do arquivo e os bytes.
    pub async fn render_payslip(&self, detail: &PayrollDetail) -> Result<(String, Vec<u8>), AppError> {
        let document = PayslipDocument::build(detail, &self.settings);
        let filename = document.filename.clone();
        let settings = self.settings.clone();

        let bytes = tokio::task::spawn_blocking(move || render_pdf(&document, &settings))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de renderização do PDF: {}", e))??;

        Ok((filename, bytes))
    }
}

fn render_pdf(document: &PayslipDocument, settings: &PayslipSettings) -> Result<Vec<u8>, AppError> {
    // 1. Fontes da pasta configurada
    let font_family = genpdf::fonts::from_files(&settings.font_dir, &settings.font_family, None).map_err(|e| {
        AppError::FontNotFound(format!(
            "{} em {}: {}",
            settings.font_family,
            settings.font_dir.display(),
            e
        ))
    })?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(document.filename.clone());

    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    decorator.set_header(|page| {
        let mut header = elements::Paragraph::new(format!("Page {}", page));
        header.set_alignment(Alignment::Right);
        header.styled(style::Style::new().with_font_size(8))
    });
    doc.set_page_decorator(decorator);

    // --- CABEÇALHO ---
    doc.push(elements::Paragraph::new(document.company_name.as_str()).styled(style::Style::new().bold().with_font_size(18)));
    doc.push(elements::Paragraph::new(document.title.as_str()).styled(style::Style::new().bold().with_font_size(14)));
    doc.push(elements::Paragraph::new(format!("Pay Period: {}", document.period)));
    doc.push(elements::Break::new(1.5));

    // --- DADOS DO FUNCIONÁRIO ---
    doc.push(line_table(&document.employee)?);
    doc.push(elements::Break::new(1.5));

    // --- PROVENTOS E DESCONTOS ---
    doc.push(section_title("Earnings"));
    doc.push(line_table(&document.earnings)?);
    doc.push(elements::Break::new(1));

    doc.push(section_title("Deductions"));
    doc.push(line_table(&document.deductions)?);
    doc.push(elements::Break::new(1.5));

    // --- TOTAIS ---
    for line in &document.totals {
        let mut total = elements::Paragraph::new(format!("{}: {}", line.label, line.value));
        total.set_alignment(Alignment::Right);
        doc.push(total.styled(style::Style::new().bold().with_font_size(12)));
    }

    doc.push(elements::Break::new(2));
    doc.push(
        elements::Paragraph::new("This is a computer-generated payslip and does not require a signature.")
            .styled(style::Style::new().italic().with_font_size(8)),
    );

    // Renderiza para Buffer (Memória)
    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(|e| AppError::PdfError(e.to_string()))?;
    Ok(buffer)
}

fn section_title(text: &'static str) -> impl Element {
    elements::Paragraph::new(text).styled(style::Style::new().bold().with_font_size(12))
}

// Tabela de duas colunas: rótulo (3) e valor (2)
fn line_table(lines: &[PayslipLine]) -> Result<elements::TableLayout, AppError> {
    let mut table = elements::TableLayout::new(vec![3, 2]);
    table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

    for line in lines {
        let mut value = elements::Paragraph::new(line.value.as_str());
        value.set_alignment(Alignment::Right);
        table
            .row()
            .element(elements::Paragraph::new(line.label.as_str()))
            .element(value)
            .push()
            .map_err(|e| AppError::PdfError(e.to_string()))?;
    }

    Ok(table)
}
