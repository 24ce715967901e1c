use std::path::Path;

pub struct HtmlTable<'a> {
    pub header_cells: bool,
    pub headers: &'a [&'a str],
    pub rows: &'a [&'a [&'a str]],
}

impl<'a> HtmlTable<'a> {
    pub fn with_header_cells(headers: &'a [&'a str], rows: &'a [&'a [&'a str]]) -> Self {
        Self {
            header_cells: true,
            headers,
            rows,
        }
    }

    pub fn plain(headers: &'a [&'a str], rows: &'a [&'a [&'a str]]) -> Self {
        Self {
            header_cells: false,
            headers,
            rows,
        }
    }

    fn render(&self, out: &mut String) {
        out.push_str("<table>");
        if self.header_cells {
            out.push_str("<thead><tr>");
            for header in self.headers {
                out.push_str(&format!("<th>{header}</th>"));
            }
            out.push_str("</tr></thead>");
        } else {
            out.push_str("<tr>");
            for header in self.headers {
                out.push_str(&format!("<td><b>{header}</b></td>"));
            }
            out.push_str("</tr>");
        }

        out.push_str("<tbody>");
        for row in self.rows {
            out.push_str("<tr>");
            for cell in *row {
                out.push_str(&format!("<td>\n  {cell}\n</td>"));
            }
            out.push_str("</tr>");
        }
        out.push_str("</tbody></table>");
    }
}

pub fn page_html(tables: &[HtmlTable<'_>]) -> String {
    let mut out = String::from("<!doctype html><html><head><title>Areas</title></head><body>");
    out.push_str("<div class=\"nav\"><a href=\"/\">Home</a></div>");
    for table in tables {
        table.render(&mut out);
    }
    out.push_str("</body></html>");
    out
}

pub fn write_page(path: &Path, tables: &[HtmlTable<'_>]) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(path, page_html(tables))?;
    Ok(())
}
