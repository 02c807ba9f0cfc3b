//! HTML pages for the evaluation view and the backend panel.

use std::fmt::Write;

use smilecheck_core::{EvaluationState, Notice, NoticeLevel, PromptSet, StructuredFindings};

pub const APP_TITLE: &str = "Avaliação Odontológica Assistida";

/// Escape text for HTML element and attribute content.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn page(heading: &str, notices: &[Notice], body: &str) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<!doctype html>\n<html lang=\"pt-BR\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n</head>\n<body>\n<header><h1>{title}</h1>\n\
         <nav><a href=\"/\">Avaliação</a> | <a href=\"/backend\">Backend</a></nav></header>\n",
        title = escape_html(APP_TITLE)
    );
    for notice in notices {
        let class = match notice.level {
            NoticeLevel::Success => "success",
            NoticeLevel::Error => "error",
        };
        let _ = writeln!(html, "<div class=\"flash {class}\">{}</div>", escape_html(&notice.message));
    }
    let _ = write!(html, "<main>\n<h2>{}</h2>\n{body}</main>\n</body>\n</html>\n", escape_html(heading));
    html
}

fn findings_table(structured: &StructuredFindings) -> String {
    let mut html = String::from(
        "<table class=\"findings\">\n<tr><th>Problema</th><th>Gravidade</th><th>Recomendação</th></tr>\n",
    );
    for finding in &structured.findings {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&finding.issue),
            escape_html(&finding.severity),
            escape_html(&finding.recommendation)
        );
    }
    html.push_str("</table>\n");
    if !structured.summary.is_empty() {
        let _ = writeln!(html, "<p class=\"summary\">{}</p>", escape_html(&structured.summary));
    }
    html
}

/// `/static/<path>` with each segment percent-encoded.
pub fn static_url(path: &str) -> String {
    let encoded: Vec<_> = path.split('/').map(urlencoding::encode).collect();
    format!("/static/{}", encoded.join("/"))
}

fn image_figure(caption: &str, path: &str) -> String {
    format!(
        "<figure><img src=\"{src}\" alt=\"{alt}\"><figcaption>{alt}</figcaption></figure>\n",
        src = escape_html(&static_url(path)),
        alt = escape_html(caption)
    )
}

/// `GET /`: upload form plus the latest evaluation.
pub fn index_page(state: &EvaluationState, notices: &[Notice]) -> String {
    let mut body = String::from(
        "<form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"smile_photo\" accept=\"image/*\">\n\
         <button type=\"submit\">Processar</button>\n</form>\n",
    );

    match &state.structured_findings {
        Some(structured) => body.push_str(&findings_table(structured)),
        None => body.push_str("<p>Nenhuma avaliação realizada ainda.</p>\n"),
    }
    if let Some(original) = &state.original_image_path {
        body.push_str(&image_figure("Imagem original", original));
    }
    if let Some(corrected) = &state.corrected_image_path {
        body.push_str(&image_figure("Imagem corrigida", corrected));
    }

    page("Avaliação do sorriso", notices, &body)
}

/// `GET /backend`: prompt editor plus the latest raw and structured analysis.
pub fn backend_page(prompts: &PromptSet, state: &EvaluationState, notices: &[Notice]) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        "<form action=\"/backend/prompts\" method=\"post\">\n\
         <label>Prompt de análise<br><textarea name=\"analysis_prompt\" rows=\"6\">{}</textarea></label><br>\n\
         <label>Prompt de correção<br><textarea name=\"enhancement_prompt\" rows=\"6\">{}</textarea></label><br>\n\
         <button type=\"submit\">Salvar prompts</button>\n</form>\n",
        escape_html(&prompts.analysis_prompt),
        escape_html(&prompts.enhancement_prompt)
    );
    if let Some(updated_at) = prompts.updated_at {
        let _ = writeln!(body, "<p>Prompts atualizados em {}</p>", updated_at.format("%Y-%m-%dT%H:%M:%SZ"));
    }

    body.push_str("<h3>Resposta bruta</h3>\n");
    match &state.last_raw_response {
        Some(raw) => {
            let _ = writeln!(body, "<pre>{}</pre>", escape_html(raw));
        }
        None => body.push_str("<p>Sem resposta registrada.</p>\n"),
    }

    body.push_str("<h3>Resultado estruturado</h3>\n");
    if let Some(structured) = &state.structured_findings {
        body.push_str(&findings_table(structured));
    }
    if let Some(updated_at) = state.updated_at {
        let _ = writeln!(body, "<p>Última avaliação em {}</p>", updated_at.format("%Y-%m-%dT%H:%M:%SZ"));
    }

    page("Painel de prompts", notices, &body)
}
