//! 报告渲染 - 业务能力层
//!
//! 把标题和若干文本行写成单页 PDF（Helvetica, WinAnsi 编码）

use crate::models::{CandidateFile, FormSubmission};

const PAGE_WIDTH: u32 = 595;
const PAGE_HEIGHT: u32 = 842;
const MARGIN: u32 = 50;
const LEADING: u32 = 14;
/// 单页可容纳的正文行数（标题占两行）
const MAX_LINES: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize - 2;

/// 渲染 PDF 文档
pub fn render_pdf(title: &str, lines: &[String]) -> Vec<u8> {
    let content = build_content_stream(title, lines);

    let objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] /Contents 4 0 R /Resources << /Font << /F1 5 0 R /F2 6 0 R >> >> >>",
            PAGE_WIDTH, PAGE_HEIGHT
        )
        .into_bytes(),
        {
            let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
            stream.extend_from_slice(&content);
            stream.extend_from_slice(b"\nendstream");
            stream
        },
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>".to_vec(),
        b"<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>".to_vec(),
    ];

    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.extend_from_slice(format!("{} 0 obj\n", i + 1).as_bytes());
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_offset = out.len();
    out.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    out.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        out.extend_from_slice(format!("{:010} 00000 n \n", offset).as_bytes());
    }
    out.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    out
}

fn build_content_stream(title: &str, lines: &[String]) -> Vec<u8> {
    let mut stream = Vec::new();
    stream.extend_from_slice(
        format!(
            "BT\n/F2 16 Tf\n{} {} Td\n{} TL\n",
            MARGIN,
            PAGE_HEIGHT - MARGIN,
            LEADING
        )
        .as_bytes(),
    );
    push_text(&mut stream, title);
    stream.extend_from_slice(b" Tj\nT* T*\n/F1 11 Tf\n");

    let overflow = lines.len().saturating_sub(MAX_LINES);
    let visible = if overflow > 0 {
        &lines[..MAX_LINES - 1]
    } else {
        lines
    };
    for line in visible {
        push_text(&mut stream, line);
        stream.extend_from_slice(b" Tj T*\n");
    }
    if overflow > 0 {
        push_text(&mut stream, &format!("... (+{} linhas)", overflow + 1));
        stream.extend_from_slice(b" Tj T*\n");
    }
    stream.extend_from_slice(b"ET");
    stream
}

/// 写入 PDF 字符串字面量，Latin-1 以外的字符替换为 `?`
fn push_text(stream: &mut Vec<u8>, text: &str) {
    stream.push(b'(');
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                stream.push(b'\\');
                stream.push(ch as u8);
            }
            ' '..='~' => stream.push(ch as u8),
            '\u{a0}'..='\u{ff}' => {
                stream.extend_from_slice(format!("\\{:03o}", ch as u32).as_bytes())
            }
            _ => stream.push(b'?'),
        }
    }
    stream.push(b')');
}

/// 模拟分析的占位报告（文件变体）
pub fn placeholder_for_files(files: &[CandidateFile], generated_at: &str) -> Vec<u8> {
    let mut lines = vec![
        "Este é um relatório de segurança simulado em PDF.".to_string(),
        format!("Gerado em: {}", generated_at),
        String::new(),
        format!("Arquivos analisados: {}", files.len()),
    ];
    lines.extend(
        files
            .iter()
            .map(|f| format!("- {} ({})", f.name(), crate::utils::format_file_size(f.size()))),
    );
    render_pdf("Relatório de Segurança", &lines)
}

/// 模拟分析的占位报告（表单变体）
pub fn placeholder_for_form(form: &FormSubmission, generated_at: &str) -> Vec<u8> {
    let lines = vec![
        "Este é um relatório de segurança simulado em PDF.".to_string(),
        format!("Gerado em: {}", generated_at),
        String::new(),
        format!("Solicitante: {}", form.employee_name),
        format!("Empresa: {}", form.company_name),
        format!("CNPJ: {}", form.cnpj),
        format!("IP alvo: {}", form.target_ip),
        format!("URL alvo: {}", form.system_url),
    ];
    render_pdf("Relatório de Segurança", &lines)
}
