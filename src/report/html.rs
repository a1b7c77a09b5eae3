// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writing `index.html`. The page is small enough that it's just built up in a
//! string.

use std::fmt::Write;

use super::{ClTable, ComparisonReport};

const TITLE: &str = "Compare PDFs (single event)";

const CSS: &str = "\
body { font-family: sans-serif; margin: 2em; }
h2 { border-bottom: 1px solid #888; }
table { border-collapse: collapse; margin: 1em 0; }
th, td { border: 1px solid #aaa; padding: 0.2em 0.6em; text-align: right; }
td.run { text-align: left; }
span.swatch { display: inline-block; width: 1em; height: 1em; margin-right: 0.4em; vertical-align: middle; }
img { max-width: 48%; }
.footer { margin-top: 2em; font-size: small; color: #555; }
";

/// Options that are followed by a username.
const USERNAME_OPTS: [&str; 2] = ["-u", "--username"];
/// Options that are followed by a password.
const PASSWORD_OPTS: [&str; 2] = ["-x", "--password"];

/// What the page says about how it was made.
#[derive(Debug, Clone)]
pub struct PageMeta {
    /// Run names and where their samples came from.
    pub inputs: Vec<(String, String)>,
    /// The arguments the program was called with. Credentials are hidden
    /// before they're written.
    pub args: Vec<String>,
    pub generated_at: String,
    pub build: String,
    /// If confidence-level lines are hidden, every histogram plot of a
    /// parameter looks the same, so only the first is shown.
    pub hide_cl_lines: bool,
}

/// Replace the values of the username and password options with
/// placeholders, and join the arguments into one string.
pub fn sanitise_command_line(args: &[String]) -> String {
    fn placeholder(opt: &str) -> Option<&'static str> {
        if USERNAME_OPTS.contains(&opt) {
            Some("<username>")
        } else if PASSWORD_OPTS.contains(&opt) {
            Some("<password>")
        } else {
            None
        }
    }

    let mut out: Vec<String> = Vec::with_capacity(args.len());
    let mut hide_next: Option<&str> = None;
    for arg in args {
        if let Some(p) = hide_next.take() {
            out.push(p.to_string());
            continue;
        }

        if let Some(p) = placeholder(arg) {
            out.push(arg.clone());
            hide_next = Some(p);
        } else if let Some((opt, p)) = arg
            .split_once('=')
            .and_then(|(opt, _)| placeholder(opt).map(|p| (opt, p)))
        {
            out.push(format!("{opt}={p}"));
        } else if let Some(short) = ["-u", "-x"]
            .into_iter()
            .find(|s| arg.len() > 2 && arg.starts_with(s) && !arg.starts_with("--"))
        {
            // Values glued to short options, e.g. "-ualbert".
            out.push(format!("{short}{}", placeholder(short).unwrap_or_default()));
        } else {
            out.push(arg.clone());
        }
    }
    out.join(" ")
}

/// Escape text for use in HTML content and attribute values.
pub(crate) fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
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
    out
}

fn format_interval(interval: Option<(f64, f64)>) -> String {
    match interval {
        Some((lo, hi)) => format!("<td>{lo:.4}</td><td>{hi:.4}</td>"),
        None => "<td>N/A</td><td>N/A</td>".to_string(),
    }
}

pub(super) fn cl_table_html(table: &ClTable) -> String {
    let mut s = String::new();
    s.push_str("<table>\n<tr><th>Run</th>");
    for cl in &table.levels {
        let _ = write!(
            s,
            "<th colspan=\"2\">{}% (Lower|Upper)</th>",
            (cl * 100.0).round() as u32
        );
    }
    s.push_str("</tr>\n");

    for row in &table.rows {
        let _ = write!(
            s,
            "<tr><td class=\"run\"><span class=\"swatch\" style=\"background-color: {}\"></span>{}</td>",
            escape(&row.colour),
            escape(&row.run)
        );
        for i in 0..table.levels.len() {
            s.push_str(&format_interval(row.intervals.get(i).copied().flatten()));
        }
        s.push_str("</tr>\n");
    }

    s.push_str("<tr><td class=\"run\">Min | Max</td>");
    for interval in table.min_max() {
        s.push_str(&format_interval(interval));
    }
    s.push_str("</tr>\n</table>\n");
    s
}

/// Render the whole page.
pub fn render_index(report: &ComparisonReport, meta: &PageMeta) -> String {
    let mut s = String::new();
    let _ = write!(
        s,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{TITLE}</title>\n<style>\n{CSS}</style>\n</head>\n<body>\n<h1>{TITLE}</h1>\n"
    );

    s.push_str("<div class=\"meta\">\n<h2>Meta</h2>\n<p>This comparison was created from the following analyses</p>\n<ul>\n");
    for (name, source) in &meta.inputs {
        let _ = writeln!(
            s,
            "<li><a href=\"{}\">{}</a></li>",
            escape(source),
            escape(name)
        );
    }
    s.push_str("</ul>\n</div>\n");

    s.push_str("<div class=\"one-d\">\n<h2>1D marginal posteriors</h2>\n");
    for (param, entry) in &report.one_d {
        let _ = writeln!(s, "<h3>{}</h3>", escape(param));
        // Without interval lines, the histogram plots only differ by name.
        let hists = if meta.hide_cl_lines {
            &entry.plots[..entry.plots.len().min(1)]
        } else {
            &entry.plots[..]
        };
        for plot in hists.iter().chain(&entry.pdf_plot) {
            let file = escape(&plot.display().to_string());
            let _ = writeln!(s, "<img src=\"{file}\" alt=\"{file}\">");
        }
        s.push_str(&cl_table_html(&entry.cl_table));
    }
    s.push_str("</div>\n");

    if !report.two_d.is_empty() {
        s.push_str("<div class=\"two-d\">\n<h2>2D greedy bin histograms</h2>\n");
        for plot in &report.two_d {
            let file = escape(&plot.display().to_string());
            let _ = writeln!(s, "<img src=\"{file}\" alt=\"{file}\">");
        }
        s.push_str("</div>\n");
    }

    let _ = write!(
        s,
        "<div class=\"footer\">\n<p>Produced using cbc-tools at {}</p>\n<p>Command line: {}</p>\n<p>{}</p>\n</div>\n</body>\n</html>\n",
        escape(&meta.generated_at),
        escape(&sanitise_command_line(&meta.args)),
        escape(&meta.build)
    );
    s
}
