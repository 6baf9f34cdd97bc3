use crate::model::{SummaryStats, ValidationResult};

/// `<` only ever appears inside JSON strings, so `\u003c` keeps the data
/// intact while no `</script>` or `<!--` can reach the HTML parser.
fn json_for_script_tag(value: &str) -> String {
    value.replace('<', "\\u003c")
}

/// Self-contained HTML report: summary counts, one card per question and a
/// syllabus-status filter that runs in the browser.
pub fn render_html(records: &[ValidationResult], stats: &SummaryStats) -> Vec<u8> {
    let json = serde_json::to_string(records).unwrap_or_else(|_| "[]".to_string());
    let json = json_for_script_tag(&json);

    let html = format!(
        r####"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>QP Scrutiniser Report</title>
  <style>
    body {{ font-family: Inter, system-ui, sans-serif; background: #f8fafc; color: #0f172a; margin: 0; }}
    header {{ background: #fff; border-bottom: 1px solid #e2e8f0; padding: 16px 32px; }}
    main {{ max-width: 1100px; margin: 0 auto; padding: 32px; }}
    .stats {{ display: flex; gap: 16px; margin-bottom: 24px; }}
    .stat {{ background: #fff; border: 1px solid #e2e8f0; border-radius: 12px; padding: 16px 24px; }}
    .stat b {{ display: block; font-size: 28px; }}
    .card {{ background: #fff; border: 1px solid #e2e8f0; border-radius: 12px; padding: 20px; margin-bottom: 16px; }}
    .card-header {{ display: flex; justify-content: space-between; align-items: center; }}
    .qid {{ font-weight: 700; }}
    .badge {{ border-radius: 9999px; padding: 2px 10px; font-size: 12px; font-weight: 600; margin-left: 6px; }}
    .in-syllabus {{ background: #dcfce7; color: #166534; }}
    .out-syllabus {{ background: #fee2e2; color: #991b1b; }}
    .other-syllabus {{ background: #fef9c3; color: #854d0e; }}
    .in-textbook {{ background: #dbeafe; color: #1e40af; }}
    .not-in-textbook {{ background: #fae8ff; color: #86198f; }}
    .reasoning-title {{ font-weight: 600; margin-top: 12px; }}
    .hidden {{ display: none; }}
  </style>
</head>
<body>
  <script type="application/json" id="records-data">{json}</script>
  <header><h2>QP Scrutiniser Report</h2></header>
  <main>
    <div class="stats">
      <div class="stat"><b>{total}</b>Questions</div>
      <div class="stat"><b>{in_syllabus}</b>In Syllabus</div>
      <div class="stat"><b>{out_of_syllabus}</b>Out of Syllabus</div>
      <div class="stat"><b>{in_textbook}</b>In Textbook</div>
    </div>
    <p>
      <label for="status-filter">Show:</label>
      <select id="status-filter">
        <option value="all">All questions</option>
        <option value="IN_SYLLABUS">In syllabus</option>
        <option value="OUT_OF_SYLLABUS">Out of syllabus</option>
        <option value="ERROR">Errors</option>
      </select>
    </p>
    <noscript><p>This report requires JavaScript to render results.</p></noscript>
    <div id="cards"></div>
  </main>
  <script>
    (function() {{
      function escapeHtml(value) {{
        return String(value == null ? '' : value)
          .replaceAll('&', '&amp;')
          .replaceAll('<', '&lt;')
          .replaceAll('>', '&gt;')
          .replaceAll('"', '&quot;')
          .replaceAll("'", '&#39;');
      }}

      function syllabusBadge(status) {{
        if (status == null || status === '') return '';
        if (status === 'IN_SYLLABUS') return '<span class="badge in-syllabus">In Syllabus</span>';
        if (status === 'OUT_OF_SYLLABUS') return '<span class="badge out-syllabus">Out of Syllabus</span>';
        const label = status === 'ERROR' ? 'Error' : escapeHtml(status);
        return '<span class="badge other-syllabus">' + label + '</span>';
      }}

      function textbookBadge(status) {{
        if (status === 'YES_IN_TEXTBOOK') return '<span class="badge in-textbook">In Textbook</span>';
        if (status === 'NO_IN_PROVIDED_TEXTBOOK_EXCERPTS') return '<span class="badge not-in-textbook">Not in Textbook</span>';
        return '';
      }}

      const records = JSON.parse(document.getElementById('records-data').textContent || '[]');
      const container = document.getElementById('cards');
      for (const r of records) {{
        const card = document.createElement('div');
        card.className = 'card';
        card.dataset.syllabusStatus = r.syllabus_status == null ? '' : String(r.syllabus_status);
        let html = '<div class="card-header"><div class="qid">' + escapeHtml(r.question_id) + '</div><div>'
          + syllabusBadge(r.syllabus_status)
          + textbookBadge(r.textbook_status) + '</div></div>'
          + '<p>' + escapeHtml(r.question_text) + '</p>'
          + '<div class="reasoning-title">Syllabus Analysis</div><div>' + escapeHtml(r.syllabus_reasoning) + '</div>';
        if (r.textbook_reasoning) {{
          html += '<div class="reasoning-title">Textbook Analysis</div><div>' + escapeHtml(r.textbook_reasoning) + '</div>';
        }}
        card.innerHTML = html;
        container.appendChild(card);
      }}

      document.getElementById('status-filter').addEventListener('change', function(e) {{
        const filter = e.target.value;
        for (const card of container.querySelectorAll('.card')) {{
          const show = filter === 'all' || card.dataset.syllabusStatus === filter;
          card.classList.toggle('hidden', !show);
        }}
      }});
    }})();
  </script>
</body>
</html>
"####,
        json = json,
        total = stats.total,
        in_syllabus = stats.in_syllabus,
        out_of_syllabus = stats.out_of_syllabus,
        in_textbook = stats.in_textbook,
    );
    html.into_bytes()
}
