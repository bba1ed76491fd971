//! Static HTML rendering of a training report.
//!
//! Tables are wired to the external sortableTable script by element id; the
//! stylesheet and scripts are referenced, never generated.

use std::borrow::Cow;
use std::io::{self, Write};

use super::maturity::training_level;
use super::names::display_name;
use super::TrainingReport;
use crate::config::ReportSettings;

const LEGEND: &str = "Understanding the above table: Prealpha is less than 1/3 of the categories \
having samples that train. Prealpha2 is up to 1/2 of the categories having samples that train. \
Prealpha 3 is up to 65%, Alpha, Alpha2, and Alpha3 are 75%, 90% and 100% respectively. If all \
categories are trained, a different logic kicks in that has to do with the number of the samples \
(as quality can only be measured by empirical testing). Prealpha may not even be useful as a proof \
of concept, depending on which categories are trained and how many. Prealpha2 and 3 will generally \
begin to show promise. Each additional sample will make a large difference. Alpha and Beta will \
change quickly, in general, with every additional sample. If you are considering using Alpha live, \
it may be worth a go. Beta most definitely should see at least some limited live testing. Beta here \
may actually be production quality. Again, the only way to know the quality of the results is \
empirical testing. Zilch means there are three or less categories populated; more work needs to be \
done.";

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\''].as_slice()) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Escapes text for a single-quoted JavaScript string inside a `<script>` block.
fn escape_js(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('<', "\\x3c")
}

fn sortable_script<W: Write>(out: &mut W, table_id: &str) -> io::Result<()> {
    writeln!(
        out,
        "<script type=\"text/javascript\"> var myTable = {{}}; window.addEvent('domready', \
function(){{ myTable = new sortableTable('{}', {{overCls: 'over', onClick: \
function(){{alert(this.id)}}}});}});</script></P>",
        escape_js(table_id)
    )
}

fn table_title<W: Write>(out: &mut W, anchor: &str, title: &str) -> io::Result<()> {
    writeln!(
        out,
        "<P><table><thead><th><a name=\"{}\">{}</a></th></thead></table>",
        escape(anchor),
        escape(title)
    )
}

fn render_head<W: Write>(out: &mut W, settings: &ReportSettings) -> io::Result<()> {
    writeln!(
        out,
        "<html><head><meta charset=\"UTF-8\" /><title>{} Training Statistics</title>",
        escape(&settings.data_set_name)
    )?;
    writeln!(
        out,
        "<link href=\"{}\" rel=\"stylesheet\" type=\"text/css\" />",
        escape(&settings.stylesheet)
    )?;
    for script in &settings.scripts {
        writeln!(
            out,
            "<script type=\"text/javascript\" src=\"{}\"></script>",
            escape(script)
        )?;
    }
    writeln!(out, "</head><body>")
}

fn render_index<W: Write>(out: &mut W, report: &TrainingReport) -> io::Result<()> {
    let tally = &report.tally;

    writeln!(out, "<P>Languages:</P>")?;
    for language in tally.languages().keys() {
        writeln!(
            out,
            "<a href=\"#{}\">{}</a>",
            escape(language),
            escape(display_name(language))
        )?;
    }

    writeln!(out, "<P>Executive Summary of Languages (Guessed Maturity):</P>")?;
    for language in tally.languages().keys() {
        writeln!(
            out,
            "<a href=\"#LM_{}\">{}</a>",
            escape(language),
            escape(display_name(language))
        )?;
    }

    writeln!(out, "<P>Categories:</P>")?;
    for category in tally.categories().keys() {
        writeln!(
            out,
            "<a href=\"#{}\">{}</a>",
            escape(category),
            escape(category)
        )?;
    }
    Ok(())
}

fn render_languages<W: Write>(out: &mut W, report: &TrainingReport) -> io::Result<()> {
    writeln!(out, "<P>Languages:</P>")?;
    for (language, categories) in report.tally.languages() {
        table_title(out, language, display_name(language))?;
        writeln!(
            out,
            "<table id=\"{}\" cellpadding=\"0\"><thead>",
            escape(language)
        )?;
        writeln!(
            out,
            "<th axis=\"string\">Category Name</th><th axis=\"number\">Relative Training Level \
(1-3 is good)</th></thead><tbody>"
        )?;

        let mut row = 0usize;
        for (category, &count) in categories {
            writeln!(
                out,
                "<tr id=\"{}\"><td>{}</td><td>{:.2}</td></tr>",
                row,
                escape(category),
                training_level(count)
            )?;
            row += 1;
        }

        let assessment = report.assessments.get(language);
        let missing = assessment.map(|a| a.missing.as_slice()).unwrap_or_default();
        for category in missing {
            writeln!(
                out,
                "<tr id=\"{}\"><td>{}</td><td>-1</td></tr>",
                row,
                escape(category)
            )?;
            row += 1;
        }

        writeln!(
            out,
            "</tbody><tfoot><tr><td colspan=\"2\">Guessed Maturity Level: {}</td></tr></tfoot></table>",
            assessment.map(|a| a.maturity.name()).unwrap_or("unknown")
        )?;
        sortable_script(out, language)?;
    }
    Ok(())
}

fn render_categories<W: Write>(out: &mut W, report: &TrainingReport) -> io::Result<()> {
    writeln!(out, "<P>Categories:</P>")?;
    for (category, languages) in report.tally.categories() {
        table_title(out, category, category)?;
        writeln!(
            out,
            "<table id=\"{}\" cellpadding=\"0\"><thead>",
            escape(category)
        )?;
        writeln!(
            out,
            "<th axis=\"string\">Language Name</th><th axis=\"number\">Relative Training Level \
(1-3 is good)</th></thead><tbody>"
        )?;
        for (row, (language, &count)) in languages.iter().enumerate() {
            writeln!(
                out,
                "<tr id=\"{}\"><td>{}</td><td>{:.2}</td></tr>",
                row,
                escape(display_name(language)),
                training_level(count)
            )?;
        }
        writeln!(
            out,
            "</tbody><tfoot><tr><td></td><td></td></tr></tfoot></table>"
        )?;
        sortable_script(out, category)?;
    }
    Ok(())
}

fn render_summary<W: Write>(out: &mut W, report: &TrainingReport) -> io::Result<()> {
    table_title(out, "LM", "Language Maturity")?;
    writeln!(out, "<table id=\"LM\" cellpadding=\"0\"><thead>")?;
    writeln!(
        out,
        "<th axis=\"string\">Language Name</th><th axis=\"string\">Guessed Maturity Level</th>\
</thead><tbody>"
    )?;
    for (row, (language, assessment)) in report.assessments.iter().enumerate() {
        writeln!(
            out,
            "<tr id=\"{}\"><td><a name=\"LM_{}\">{}</a></td><td>{}</td></tr>",
            row,
            escape(language),
            escape(display_name(language)),
            assessment.maturity
        )?;
    }
    writeln!(
        out,
        "</tbody><tfoot><tr><td></td><td></td></tr></tfoot></table>"
    )?;
    sortable_script(out, "LM")
}

fn render_legend<W: Write>(out: &mut W, settings: &ReportSettings) -> io::Result<()> {
    writeln!(out, "<P>{}</P>", LEGEND)?;
    writeln!(
        out,
        "<P>Categories excluded from maturity (likely to be removed due to difficulty in \
training, using, or ambiguity):<br/>"
    )?;
    for category in &settings.non_maturity_categories {
        writeln!(out, "{}<br/>", escape(category))?;
    }
    writeln!(out, "</P>")
}

/// Writes the full HTML document.
pub fn render_html<W: Write>(
    report: &TrainingReport,
    settings: &ReportSettings,
    out: &mut W,
) -> io::Result<()> {
    render_head(out, settings)?;
    render_index(out, report)?;
    render_languages(out, report)?;
    render_categories(out, report)?;
    render_summary(out, report)?;
    render_legend(out, settings)?;
    writeln!(out, "</body></html>")
}
