/// Embedded single-file dashboard (HTML + CSS + JS)
pub const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Elo Ratings</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1.5rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  nav a { color: var(--muted); text-decoration: none; margin-right: 1rem; font-size: .9rem; cursor: pointer; }
  nav a.active, nav a:hover { color: var(--accent); }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; display: flex; justify-content: space-between; align-items: center; }
  .banner { padding: .8rem 1.2rem; color: #ff9800; font-size: .85rem; }
  .headline { padding: .8rem 1.2rem; color: var(--muted); font-size: .9rem; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .7rem 1rem; text-align: left; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .65rem 1rem; font-size: .88rem; border-bottom: 1px solid #1e2130; }
  tr:last-child td { border-bottom: none; }
  .pos { color: var(--green); }
  .neg { color: var(--red); }
  .empty { color: var(--muted); text-align: center; padding: 2rem; font-size: .9rem; }
  select { background: var(--bg); color: var(--text); border: 1px solid var(--border); border-radius: 6px; padding: .3rem .6rem; }
  footer { padding: 1rem 2rem; color: var(--muted); font-size: .8rem; border-top: 1px solid var(--border); }
  footer a { color: var(--muted); margin-right: 1rem; }
</style>
</head>
<body>
<header>
  <h1>Elo Ratings</h1>
  <nav id="nav">
    <a data-view="home" class="active">Home</a>
    <a data-view="upcoming">Upcoming</a>
    <a data-view="past">Past</a>
    <a data-view="ratings">Team Ratings</a>
    <a data-view="evaluation">Evaluation</a>
  </nav>
  <span style="margin-left:auto"><select id="sport"></select></span>
</header>

<main id="main"><div class="empty">Loading…</div></main>

<footer>
  <a href="/about">About</a><a href="/privacy-policy">Privacy Policy</a><a href="/terms-of-service">Terms of Service</a>
</footer>

<script>
const esc = v => String(v ?? '').replace(/[&<>"']/g, c => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;', "'": '&#39;' })[c]);
const n2 = v => typeof v === 'number' ? v.toFixed(2) : '';
const when = ts => new Date(ts).toLocaleString(undefined, { year:'numeric', month:'numeric', day:'numeric', hour:'numeric', minute:'numeric', hour12:true });
let view = 'home';
let sport = document.body.dataset.sport || 'COLLEGE_BASKETBALL';

function panel(title, inner) {
  return `<div class="panel"><div class="panel-header">${title}</div>${inner}</div>`;
}

function table(headers, rows) {
  if (!rows.length) return `<div class="empty">No Games to Show</div>`;
  return `<table><thead><tr>${headers.map(h => `<th>${h}</th>`).join('')}</tr></thead>
    <tbody>${rows.map(r => `<tr>${r.map(c => `<td>${c}</td>`).join('')}</tr>`).join('')}</tbody></table>`;
}

function eventRows(events, withSport) {
  return events.map(e => [
    ...(withSport ? [esc(e.sport)] : []), esc(when(e.datetime)), esc(e.home_team_name), esc(e.away_team_name),
    n2(e.elo_spread), n2(e.home_elo_prob), n2(e.away_elo_prob), n2(e.home_elo_pre), n2(e.away_elo_pre), n2(e.elo_diff),
  ]);
}

const EVENT_HEADERS = ['Date', 'Home Team', 'Away Team', 'Elo Spread', 'Home Elo Prob', 'Away Elo Prob', 'Home Elo Pre', 'Away Elo Pre', 'Elo Diff'];
const METRICS = [
  ['system_records', 'Games'], ['system_accuracy', 'Accuracy'], ['system_mae', 'Mean Average Error'],
  ['system_brier_score', 'Brier Score'], ['avg_number_of_games_played', 'AVG Games Played'],
  ['avg_points_per_game', 'AVG Points Per Game'], ['home_win_percentage', 'Home Win Percentage'],
];
const metricRow = (label, m) => [label, ...METRICS.map(([k]) => m ? (k === 'system_records' ? (m[k] ?? '') : n2(m[k])) : '')];

async function getJson(url) {
  const r = await fetch(url);
  if (!r.ok) throw new Error(await r.text());
  return r.json();
}

async function renderHome() {
  const s = await getJson('/api/home');
  if (s.status !== 'ready') return `<div class="empty">Loading…</div>`;
  const d = s.data;
  const banner = d.error ? `<div class="banner">${esc(d.error)}</div>` : '';
  const evals = Object.entries(d.evaluations).flatMap(([key, ev]) => [
    metricRow(`${esc(key)} ${esc(ev.latest_season)}`, ev.latest), metricRow(`${esc(key)} ALL`, ev.all_time),
  ]);
  return panel('Upcoming Events', banner + table(['Sport', ...EVENT_HEADERS], eventRows(d.upcoming_events, true)))
    + panel('System Evaluation', table(['System', ...METRICS.map(([, l]) => l)], evals));
}

async function renderUpcoming() {
  const s = await getJson(`/api/sports/${sport}/upcoming`);
  return panel(`Upcoming Events · ${sport}`, table(EVENT_HEADERS, s.status === 'loaded' ? eventRows(s.data, false) : []));
}

async function renderPast() {
  const v = await getJson(`/api/sports/${sport}/past`);
  const events = v.events.status === 'loaded' ? v.events.data : [];
  const headline = v.headline ? `<div class="headline">${esc(v.headline)}</div>` : '';
  const rows = events.map(e => {
    const ok = e.result === (e.home_elo_prob > 0.5);
    return [esc(when(e.datetime)), esc(e.home_team_name), esc(e.away_team_name), n2(e.elo_spread), n2(e.point_dif),
      `<span class="${ok ? 'pos' : 'neg'}">${n2(e.home_elo_prob)}</span>`, e.result ? 1 : 0];
  });
  return panel(`Past Events · ${sport}`, headline
    + `<div class="headline">All spreads and results are based on the home team (ex. -3 home team favored by 3)</div>`
    + table(['Date', 'Home Team', 'Away Team', 'Elo Spread', 'Actual Spread', 'Home Elo Prob', 'Actual Result'], rows));
}

async function renderRatings() {
  const d = await getJson(`/api/sports/${sport}`);
  const st = d.settings.status === 'loaded' ? d.settings.data : null;
  const settings = st
    ? `<div class="headline">K: ${esc(st.k)} · HFA: ${esc(st.hfa)} · STARTING ELO: ${esc(st.mean_elo)} · NUMBER OF TEAMS: ${esc(st.number_of_teams)} · NUMBER OF SEASONS: ${esc(st.number_of_seasons)}</div>`
    : `<div class="empty">No system settings found for ${sport}.</div>`;
  const teams = d.teams.status === 'loaded' ? d.teams.data : [];
  return panel(esc(st ? st.system_name : d.name), settings)
    + panel('Team Ratings', table(['Rank', 'Team Name', 'ELO Rating', 'Last Updated'],
        teams.map(t => [esc(t.rank), esc(t.team_name), n2(t.elo_rating), esc(new Date(t.lastupdated).toLocaleString())])));
}

async function renderEvaluation() {
  const s = await getJson(`/api/sports/${sport}/evaluation`);
  if (s.status !== 'loaded') return panel(`Evaluation · ${sport}`, `<div class="empty">No evaluation found for ${sport}.</div>`);
  const rows = Object.entries(s.data.seasons.evaluations).reverse().map(([season, m]) => metricRow(esc(season), m));
  return panel(`Evaluation · ${sport}`, table(['Season', ...METRICS.map(([, l]) => l)], rows));
}

const VIEWS = { home: renderHome, upcoming: renderUpcoming, past: renderPast, ratings: renderRatings, evaluation: renderEvaluation };

async function render() {
  const main = document.getElementById('main');
  main.innerHTML = '<div class="empty">Loading…</div>';
  try {
    main.innerHTML = await VIEWS[view]();
  } catch (e) {
    console.error(e);
    main.innerHTML = '<div class="empty">No data</div>';
  }
}

async function init() {
  const sports = await getJson('/api/sports');
  const select = document.getElementById('sport');
  select.innerHTML = sports.map(s => `<option value="${esc(s.key)}">${esc(s.name)}</option>`).join('');
  select.value = sport;
  select.addEventListener('change', e => { sport = e.target.value; render(); });
  document.querySelectorAll('#nav a').forEach(a => a.addEventListener('click', () => {
    document.querySelectorAll('#nav a').forEach(x => x.classList.remove('active'));
    a.classList.add('active');
    view = a.dataset.view;
    render();
  }));
  render();
}

init();
// Home aggregate refreshes in the background; re-render it periodically
setInterval(() => { if (view === 'home') render(); }, 30000);
</script>
</body>
</html>"#;

macro_rules! static_page {
    ($body:literal) => {
        concat!(
            r#"<!DOCTYPE html><html lang="en"><head><meta charset="UTF-8"><title>Elo Ratings</title>
<style>body{background:#0f1117;color:#e0e0e0;font-family:'Segoe UI',system-ui,sans-serif;max-width:760px;margin:3rem auto;padding:0 1.5rem;line-height:1.6}
h1{margin-bottom:1rem}a{color:#6c63ff}</style></head><body>"#,
            $body,
            r#"<p><a href="/">Back to the dashboard</a></p></body></html>"#
        )
    };
}

pub const ABOUT_HTML: &str = static_page!(
    r#"<h1>About</h1>
<p>Elo ratings, game predictions and system evaluations for college and professional sports.
Ratings are produced by an external Elo pipeline and published as static reports; this site only displays them.</p>
<p>Spreads are quoted from the home team's perspective: a spread of -3 means the home team is favoured by 3.</p>"#
);

pub const PRIVACY_HTML: &str = static_page!(
    r#"<h1>Privacy Policy</h1>
<p>This site stores no personal data. Pages are rendered from public report files and no accounts, cookies or analytics are used.</p>"#
);

pub const TERMS_HTML: &str = static_page!(
    r#"<h1>Terms of Service</h1>
<p>Ratings and predictions are provided as-is for informational purposes only and carry no guarantee of accuracy.</p>"#
);

pub const NOT_FOUND_HTML: &str = static_page!(
    r#"<h1>Page not found</h1>
<p>The page you requested does not exist.</p>"#
);
