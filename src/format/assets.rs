//! Inline stylesheet, script and icons for the HTML report.
//!
//! The report is a single file, so everything here is embedded verbatim.
//! The script reads `window.chartData`, `window.pivotData` and
//! `window.runsData`, which the renderer emits before it.

/// Inline SVG icon (Feather-style strokes). Unknown names render nothing.
#[must_use]
pub fn icon(name: &str, size: u32, color: &str) -> String {
    let body = match name {
        "copy" => {
            r#"<rect x="9" y="9" width="13" height="13" rx="2" ry="2"></rect><path d="M5 15H4a2 2 0 0 1-2-2V4a2 2 0 0 1 2-2h9a2 2 0 0 1 2 2v1"></path>"#
        }
        "error" => {
            r#"<circle cx="12" cy="12" r="10"></circle><line x1="15" y1="9" x2="9" y2="15"></line><line x1="9" y1="9" x2="15" y2="15"></line>"#
        }
        "warning" => {
            r#"<path d="M10.29 3.86L1.82 18a2 2 0 0 0 1.71 3h16.94a2 2 0 0 0 1.71-3L13.71 3.86a2 2 0 0 0-3.42 0z"></path><line x1="12" y1="9" x2="12" y2="13"></line><line x1="12" y1="17" x2="12.01" y2="17"></line>"#
        }
        "info" => {
            r#"<circle cx="12" cy="12" r="10"></circle><line x1="12" y1="16" x2="12" y2="12"></line><line x1="12" y1="8" x2="12.01" y2="8"></line>"#
        }
        "search" => r#"<circle cx="11" cy="11" r="8"></circle><path d="m21 21-4.35-4.35"></path>"#,
        _ => return String::new(),
    };
    format!(
        r#"<svg width="{size}" height="{size}" viewBox="0 0 24 24" fill="none" stroke="{color}" stroke-width="2" stroke-linecap="round" stroke-linejoin="round">{body}</svg>"#
    )
}

pub const CSS: &str = r#"
:root {
    --bg-primary: #ffffff;
    --bg-secondary: #f8fafc;
    --bg-hover: #e0e7ff;
    --text-primary: #0f172a;
    --text-secondary: #64748b;
    --border-color: #e2e8f0;
    --accent-color: #3b82f6;
    --modal-backdrop: rgba(0, 0, 0, 0.4);
    --success-bg: #d1fae5;
    --success-text: #065f46;
    --error-bg: #fee2e2;
    --error-text: #991b1b;
    --warning-bg: #fef3c7;
    --warning-text: #92400e;
    --log-bg: #1e293b;
    --log-text: #e2e8f0;
}
[data-theme="dark"] {
    --bg-primary: #1e293b;
    --bg-secondary: #0f172a;
    --bg-hover: #334155;
    --text-primary: #f1f5f9;
    --text-secondary: #cbd5e1;
    --border-color: #334155;
    --accent-color: #60a5fa;
    --modal-backdrop: rgba(0, 0, 0, 0.7);
    --success-bg: #064e3b;
    --success-text: #a7f3d0;
    --error-bg: #7f1d1d;
    --error-text: #fca5a5;
    --warning-bg: #78350f;
    --warning-text: #fcd34d;
    --log-bg: #0f172a;
}
* { margin: 0; padding: 0; box-sizing: border-box; }
body {
    font-family: 'Inter', -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    background: var(--bg-secondary);
    color: var(--text-primary);
}
svg { display: inline-block; vertical-align: middle; flex-shrink: 0; }
.container { background: var(--bg-primary); min-height: 100vh; }
.header {
    padding: 20px 40px;
    border-bottom: 1px solid var(--border-color);
    display: flex;
    justify-content: space-between;
    align-items: center;
}
.header h1 { font-size: 22px; font-weight: 600; margin-bottom: 4px; }
.subtle { color: var(--text-secondary); }
.tabs { display: flex; gap: 24px; padding: 0 40px; border-bottom: 1px solid var(--border-color); }
.tab-btn {
    padding: 16px 4px;
    background: none;
    border: none;
    border-bottom: 2px solid transparent;
    color: var(--text-secondary);
    font-weight: 500;
    cursor: pointer;
}
.tab-btn.active { color: var(--accent-color); border-bottom-color: var(--accent-color); }
.tab-content { display: none; padding: 24px 40px; }
.tab-content.active { display: block; }
.summary-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(180px, 1fr)); gap: 16px; }
.card {
    background: var(--bg-primary);
    border: 1px solid var(--border-color);
    border-radius: 8px;
    padding: 16px;
}
.card .label { font-size: 12px; text-transform: uppercase; color: var(--text-secondary); }
.card .value { font-size: 26px; font-weight: 600; margin-top: 6px; }
.latest-card { grid-column: span 2; }
.latest-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 12px; margin-top: 12px; text-align: center; }
.latest-grid .figure { font-size: 20px; font-weight: 600; }
.git-line {
    margin-top: 12px;
    padding-top: 12px;
    border-top: 1px solid var(--border-color);
    display: flex;
    justify-content: center;
    gap: 8px;
    font-size: 12px;
}
.git-line code { background: var(--bg-secondary); padding: 3px 8px; border-radius: 4px; }
.git-line .commit { cursor: pointer; }
.dirty-dot { color: #ef4444; font-size: 14px; }
.trend-up { color: #10b981; }
.trend-down { color: #ef4444; }
.trend-flat { color: var(--text-secondary); }
.charts-container { display: grid; grid-template-columns: 1fr 1fr; gap: 24px; margin: 24px 0; }
.chart-wrapper { height: 280px; border: 1px solid var(--border-color); border-radius: 8px; padding: 12px; }
.flaky-section h3 { margin-bottom: 12px; font-size: 16px; }
.flaky-grid { display: grid; grid-template-columns: repeat(auto-fill, minmax(280px, 1fr)); gap: 12px; }
.flaky-card { cursor: pointer; }
.flaky-card:hover { border-color: var(--accent-color); }
.flaky-header { display: flex; gap: 8px; margin-bottom: 8px; }
.flaky-name { font-size: 13px; word-break: break-word; }
.flaky-stats { font-size: 12px; color: var(--text-secondary); margin-top: 6px; }
.filters { display: flex; gap: 12px; flex-wrap: wrap; margin-bottom: 16px; }
.filter-input, .btn {
    padding: 8px 12px;
    border: 1px solid var(--border-color);
    border-radius: 6px;
    background: var(--bg-primary);
    color: var(--text-primary);
    font-size: 13px;
}
.btn { cursor: pointer; }
.btn:hover { background: var(--bg-hover); }
.table-wrapper { overflow: auto; max-height: 75vh; border: 1px solid var(--border-color); border-radius: 8px; }
table { border-collapse: collapse; width: 100%; font-size: 13px; }
th, td { padding: 8px 10px; border-bottom: 1px solid var(--border-color); text-align: left; white-space: nowrap; }
thead th { position: sticky; top: 0; background: var(--bg-secondary); z-index: 2; }
.run-header { cursor: pointer; text-align: center; }
.run-header:hover { color: var(--accent-color); }
.run-header .meta { font-size: 10px; font-weight: 400; color: var(--text-secondary); }
tbody tr:hover { background: var(--bg-hover); }
.test-name-cell { white-space: normal; min-width: 320px; }
.test-name-wrapper { display: flex; align-items: flex-start; gap: 8px; justify-content: space-between; }
.test-breadcrumb { display: flex; flex-wrap: wrap; gap: 4px; align-items: center; }
.breadcrumb-container { color: var(--text-secondary); font-size: 12px; }
.breadcrumb-container.level-0 { font-weight: 600; }
.breadcrumb-separator { color: var(--text-secondary); }
.breadcrumb-leaf { font-weight: 500; }
.copy-test-name-btn {
    opacity: 0;
    border: 1px solid var(--border-color);
    background: var(--bg-primary);
    color: var(--text-secondary);
    border-radius: 4px;
    font-size: 11px;
    padding: 2px 6px;
    cursor: pointer;
}
tr:hover .copy-test-name-btn { opacity: 1; }
.stats-cell { text-align: center; }
.pass-rate { font-weight: 600; }
.rate-high { color: #10b981; }
.rate-medium { color: #f59e0b; }
.rate-low { color: #ef4444; }
.counts, .avg-time { font-size: 11px; color: var(--text-secondary); }
.result-cell { cursor: pointer; text-align: center; }
.result-cell:hover { background: var(--bg-hover); }
.absent-cell { text-align: center; color: var(--text-secondary); }
.badge {
    display: inline-block;
    padding: 2px 8px;
    border-radius: 10px;
    font-size: 11px;
    font-weight: 600;
    background: var(--warning-bg);
    color: var(--warning-text);
}
.badge.passed { background: var(--success-bg); color: var(--success-text); }
.badge.failed { background: var(--error-bg); color: var(--error-text); }
.runtime { display: block; font-size: 11px; margin-top: 2px; }
.runtime-fast { color: #10b981; }
.runtime-medium { color: #f59e0b; }
.runtime-slow { color: #ef4444; }
.comparison-run-info { display: grid; grid-template-columns: 1fr 1fr; gap: 16px; margin-top: 16px; }
.run-info-card { border: 1px solid var(--border-color); border-radius: 8px; padding: 12px; font-size: 13px; }
.run-info-card h4 { margin-bottom: 8px; }
.comparison-grid { display: grid; grid-template-columns: repeat(3, 1fr); gap: 16px; margin-top: 20px; }
.comparison-col { border: 1px solid var(--border-color); border-radius: 8px; padding: 12px; min-height: 120px; }
.comparison-col h4 { margin-bottom: 8px; }
.comparison-item { padding: 8px; border-bottom: 1px solid var(--border-color); cursor: pointer; font-size: 13px; }
.comparison-item .meta { font-size: 11px; color: var(--text-secondary); margin-top: 4px; }
.empty-list { color: var(--text-secondary); padding: 20px; text-align: center; }
.modal {
    display: none;
    position: fixed;
    inset: 0;
    background: var(--modal-backdrop);
    z-index: 100;
    align-items: center;
    justify-content: center;
}
.modal.open { display: flex; }
.modal-content {
    background: var(--bg-primary);
    width: min(1100px, 94vw);
    max-height: 90vh;
    border-radius: 10px;
    display: flex;
    flex-direction: column;
}
.modal-header { display: flex; justify-content: space-between; align-items: center; padding: 16px 20px; border-bottom: 1px solid var(--border-color); }
.modal-header h2 { font-size: 16px; word-break: break-word; }
.close-btn { font-size: 24px; cursor: pointer; color: var(--text-secondary); }
.modal-body { padding: 16px 20px; overflow: auto; }
.modal-tabs { display: flex; gap: 16px; border-bottom: 1px solid var(--border-color); margin-bottom: 12px; }
.modal-tab { background: none; border: none; padding: 8px 2px; cursor: pointer; color: var(--text-secondary); border-bottom: 2px solid transparent; }
.modal-tab.active { color: var(--accent-color); border-bottom-color: var(--accent-color); }
.modal-tab-content { display: none; }
.modal-tab-content.active { display: block; }
.kv { display: grid; grid-template-columns: max-content 1fr; gap: 6px 16px; font-size: 13px; margin-bottom: 12px; }
.kv dt { color: var(--text-secondary); }
.failure-box {
    background: var(--error-bg);
    color: var(--error-text);
    padding: 12px;
    border-radius: 6px;
    white-space: pre-wrap;
    font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
    font-size: 12px;
}
.file-block { margin-top: 12px; border: 1px solid var(--border-color); border-radius: 6px; }
.file-block summary { padding: 8px 12px; cursor: pointer; font-size: 13px; }
.log-controls { display: flex; flex-wrap: wrap; gap: 6px; padding: 8px 12px; align-items: center; font-size: 12px; }
.log-controls .btn { padding: 4px 8px; font-size: 12px; }
.log-controls .filter-input { padding: 4px 8px; min-width: 180px; }
.log-filters { position: relative; }
.log-filters-menu {
    display: none;
    position: absolute;
    top: 110%;
    left: 0;
    z-index: 10;
    min-width: 180px;
    padding: 8px;
    background: var(--bg-primary);
    border: 1px solid var(--border-color);
    border-radius: 6px;
    box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15);
}
.log-filters-menu.show { display: block; }
.log-filters-menu label { display: flex; align-items: center; gap: 6px; padding: 3px 0; text-transform: capitalize; }
.filter-count { margin-left: auto; color: var(--text-secondary); }
.log-filters-actions { display: flex; gap: 6px; margin-top: 6px; }
.log-view {
    position: relative;
    background: var(--log-bg);
    color: var(--log-text);
    font-family: ui-monospace, SFMono-Regular, Menlo, monospace;
    font-size: 12px;
    padding: 12px 0;
    max-height: 55vh;
    overflow: auto;
    white-space: pre;
}
.log-line { display: flex; min-height: 1.4em; transition: background 0.3s ease; }
.log-line.hidden { display: none; }
.log-line.flash { background: rgba(96, 165, 250, 0.3); }
.log-line-number {
    flex-shrink: 0;
    width: 56px;
    padding-right: 12px;
    text-align: right;
    color: #64748b;
    user-select: none;
}
.log-line-content { flex: 1; padding-right: 12px; }
.log-view.wrap .log-line-content { white-space: pre-wrap; word-break: break-all; }
.log-line.level-error .log-line-content { color: #fca5a5; }
.log-line.level-warning .log-line-content { color: #fcd34d; }
.log-line.log-separator { border-top: 1px dashed #475569; margin-top: 6px; }
.log-line.log-step .log-line-content { color: #93c5fd; font-weight: 600; }
.log-line.log-passed { background: rgba(16, 185, 129, 0.15); }
.log-line.log-failed { background: rgba(239, 68, 68, 0.2); }
mark.search-hit { background: #fde68a; color: #0f172a; border-radius: 2px; }
mark.search-hit.current { background: #f97316; color: #ffffff; }
.pprof-section { margin-top: 12px; border: 1px solid var(--border-color); border-radius: 6px; padding: 12px; }
.pprof-section-title { font-weight: 600; font-size: 14px; margin-bottom: 8px; }
.pprof-header { position: relative; display: flex; justify-content: space-between; align-items: center; margin-bottom: 10px; }
.pprof-stats { display: flex; gap: 16px; font-size: 13px; color: var(--text-secondary); }
.pprof-stats strong { color: var(--text-primary); }
.pprof-help-btn { padding: 3px 8px; font-size: 11px; }
.pprof-help-popup {
    display: none;
    position: absolute;
    right: 0;
    top: 110%;
    z-index: 10;
    max-width: 360px;
    padding: 10px 12px;
    font-size: 12px;
    background: var(--bg-primary);
    border: 1px solid var(--border-color);
    border-radius: 6px;
    box-shadow: 0 4px 12px rgba(0, 0, 0, 0.15);
}
.pprof-help-popup.visible { display: block; }
.pprof-help-popup code { background: var(--bg-secondary); padding: 1px 4px; border-radius: 3px; }
.pprof-bars { display: flex; flex-direction: column; gap: 6px; }
.pprof-bar-item { display: grid; grid-template-columns: 200px 1fr; gap: 8px; align-items: center; font-size: 12px; }
.pprof-bar-label { overflow: hidden; text-overflow: ellipsis; white-space: nowrap; font-family: ui-monospace, SFMono-Regular, Menlo, monospace; }
.pprof-bar-container { position: relative; height: 18px; background: var(--bg-secondary); border-radius: 4px; }
.pprof-bar { height: 100%; background: linear-gradient(90deg, #3b82f6, #8b5cf6); border-radius: 4px; }
.pprof-bar-value { position: absolute; right: 6px; top: 1px; font-size: 11px; color: var(--text-primary); }
.pprof-stacks { display: flex; flex-direction: column; gap: 4px; }
.pprof-stack-item { border: 1px solid var(--border-color); border-radius: 4px; }
.pprof-stack-header { display: flex; gap: 8px; align-items: center; padding: 6px 8px; cursor: pointer; font-size: 12px; }
.pprof-stack-header:hover { background: var(--bg-hover); }
.pprof-stack-count { min-width: 40px; font-weight: 600; color: var(--accent-color); }
.pprof-stack-name { flex: 1; overflow: hidden; text-overflow: ellipsis; white-space: nowrap; font-family: ui-monospace, SFMono-Regular, Menlo, monospace; }
.pprof-stack-toggle { font-size: 10px; color: var(--text-secondary); transition: transform 0.2s; }
.pprof-stack-item.expanded .pprof-stack-toggle { transform: rotate(90deg); }
.pprof-stack-frames { display: none; padding: 6px 8px 8px 56px; border-top: 1px solid var(--border-color); }
.pprof-stack-item.expanded .pprof-stack-frames { display: block; }
.pprof-frame { font-family: ui-monospace, SFMono-Regular, Menlo, monospace; font-size: 11px; padding: 1px 0; word-break: break-all; }
.pprof-raw-toggle { margin-top: 10px; font-size: 12px; }
.pprof-raw-content { display: none; margin-top: 8px; }
.pprof-raw-content.visible { display: block; }
.history { display: flex; gap: 4px; flex-wrap: wrap; }
.notification {
    position: fixed;
    bottom: 24px;
    right: 24px;
    padding: 10px 16px;
    border-radius: 6px;
    background: var(--success-bg);
    color: var(--success-text);
    z-index: 200;
}
.notification.warning { background: var(--warning-bg); color: var(--warning-text); }
@media (max-width: 900px) {
    .charts-container, .comparison-grid, .comparison-run-info { grid-template-columns: 1fr; }
    .latest-card { grid-column: auto; }
}
"#;

pub const JS: &str = r#"
const PATTERN_DESCRIPTIONS = {
    intermittent: 'Fails randomly with no clear pattern',
    occasional: 'Fails infrequently, mostly passes',
    frequent: 'Fails often, passes sometimes',
    alternating: 'Alternates between pass and fail',
    unstable: 'Highly unpredictable behavior'
};

function patternDescription(pattern) {
    return PATTERN_DESCRIPTIONS[pattern] || 'Unknown pattern';
}

function escapeHtml(text) {
    return String(text === undefined || text === null ? '' : text)
        .replace(/&/g, '&amp;')
        .replace(/</g, '&lt;')
        .replace(/>/g, '&gt;')
        .replace(/"/g, '&quot;')
        .replace(/'/g, '&#39;');
}

function formatDuration(seconds) {
    if (!seconds || seconds <= 0) return 'N/A';
    const whole = Math.floor(seconds);
    const h = Math.floor(whole / 3600);
    const m = Math.floor((whole % 3600) / 60);
    const s = whole % 60;
    if (h > 0) return `${h}h ${m}m ${s}s`;
    if (m > 0) return `${m}m ${s}s`;
    return `${s}s`;
}

function stateClass(state) {
    return String(state || '').toLowerCase().replace(/[^a-z0-9-]/g, '');
}

// Tabs & theme
function switchTab(tabId) {
    document.querySelectorAll('.tab-btn').forEach(b => b.classList.toggle('active', b.dataset.tab === tabId));
    document.querySelectorAll('.tab-content').forEach(c => c.classList.toggle('active', c.id === tabId));
}

function applyTheme(theme) {
    document.documentElement.setAttribute('data-theme', theme);
    const btn = document.getElementById('themeToggle');
    if (btn) btn.textContent = theme === 'dark' ? 'Light mode' : 'Dark mode';
}

function toggleTheme() {
    const next = document.documentElement.getAttribute('data-theme') === 'dark' ? 'light' : 'dark';
    localStorage.setItem('theme', next);
    applyTheme(next);
}

// Notifications & clipboard
function showNotification(message, type = 'success') {
    const note = document.createElement('div');
    note.className = 'notification ' + type;
    note.textContent = message;
    document.body.appendChild(note);
    setTimeout(() => note.remove(), 2000);
}

function copyToClipboard(text, message) {
    if (navigator.clipboard && window.isSecureContext) {
        navigator.clipboard.writeText(text).then(() => showNotification(message));
        return;
    }
    const area = document.createElement('textarea');
    area.value = text;
    document.body.appendChild(area);
    area.select();
    try {
        document.execCommand('copy');
        showNotification(message);
    } catch (e) {
        showNotification('Copy failed', 'warning');
    }
    area.remove();
}

function copyWithElementFeedback(text, element) {
    copyToClipboard(text, 'Copied!');
    element.classList.add('copied');
    setTimeout(() => element.classList.remove('copied'), 1500);
}

function copyTestName(btn) {
    event.stopPropagation();
    copyToClipboard(btn.dataset.testName, 'Test name copied');
}

function visibleRows() {
    return Array.from(document.querySelectorAll('#resultsTable tbody tr'))
        .filter(row => row.style.display !== 'none');
}

function copyAllTestNames() {
    const names = visibleRows().map(row => window.pivotData[Number(row.dataset.row)].test_name);
    if (names.length === 0) {
        showNotification('No tests visible to copy', 'warning');
        return;
    }
    copyToClipboard(names.join('\n'), `Copied ${names.length} tests`);
}

// Matrix filtering
function filterTable() {
    const search = document.getElementById('searchInput').value.toLowerCase();
    const status = document.getElementById('statusFilter').value;
    const stability = document.getElementById('stabilityFilter').value;
    const label = document.getElementById('labelFilter').value;

    document.querySelectorAll('#resultsTable tbody tr').forEach(row => {
        const data = window.pivotData[Number(row.dataset.row)];
        const cells = Object.values(data.runs).filter(r => r);

        const matchesSearch = data.test_name.toLowerCase().includes(search);
        const matchesStatus = status === 'all' || cells.some(r => r.state === status);
        let matchesStability = true;
        if (stability === 'flaky') matchesStability = data.is_flaky;
        if (stability === 'stable') matchesStability = !data.is_flaky && data.fail_count === 0;
        if (stability === 'always-failing') matchesStability = data.pass_count === 0;
        const matchesLabel = label === 'all' || cells.some(r => r.labels && r.labels.includes(label));

        row.style.display = matchesSearch && matchesStatus && matchesStability && matchesLabel ? '' : 'none';
    });
}

// ANSI color codes in logs
function ansiToHtml(text) {
    if (!text) return '';
    const colors = {
        30: 'black', 31: '#ef4444', 32: '#10b981', 33: '#f59e0b',
        34: '#3b82f6', 35: '#d946ef', 36: '#06b6d4', 37: '#f8fafc',
        90: '#64748b', 91: '#f87171', 92: '#34d399', 93: '#fbbf24',
        94: '#60a5fa', 95: '#e879f9', 96: '#22d3ee', 97: '#ffffff'
    };
    let html = '';
    let style = [];
    for (const part of text.split(/(\x1b\[[0-9;]*m)/g)) {
        if (part.startsWith('\x1b[')) {
            for (const code of part.slice(2, -1).split(';').map(Number)) {
                if (code === 0) style = [];
                else if (code === 1) style.push('font-weight:bold');
                else if (code === 4) style.push('text-decoration:underline');
                else if (colors[code]) style.push(`color:${colors[code]}`);
            }
        } else if (part) {
            const attr = style.length ? ` style="${style.join(';')}"` : '';
            html += `<span${attr}>${escapeHtml(part)}</span>`;
        }
    }
    return html;
}

// Log viewer
let viewerCounter = 0;
const LOG_ZOOM_STEPS = [85, 100, 115, 130];
const LOG_LEVELS = ['error', 'warning', 'info', 'debug'];
const logStates = {};

function logState(id) {
    if (!logStates[id]) {
        logStates[id] = { font: 1, errors: null, errorIdx: -1, matches: [], matchIdx: -1, original: null };
    }
    return logStates[id];
}

function stripAnsi(text) {
    return String(text || '').replace(/\x1b\[[0-9;]*m/g, '');
}

function logLevel(plain) {
    const text = plain.toLowerCase();
    if (text.includes('error') || text.includes('failed') || text.includes('panic') || text.includes('✗')) return 'error';
    if (text.includes('warn')) return 'warning';
    if (text.includes('debug')) return 'debug';
    return 'info';
}

// Ginkgo structure: spec separators, STEP markers and spec results.
function highlightLogSyntax(plain) {
    if (/^-{30,}$/.test(plain.trim())) return ' log-separator';
    if (/\[FAILED\]|\bFAIL!/.test(plain)) return ' log-failed';
    if (/\[PASSED\]|\bSUCCESS!/.test(plain)) return ' log-passed';
    if (/\bSTEP:/.test(plain)) return ' log-step';
    return '';
}

function logLineHtml(line, idx) {
    const plain = stripAnsi(line);
    const level = logLevel(plain);
    return `<div class="log-line level-${level}${highlightLogSyntax(plain)}" data-level="${level}">` +
        `<span class="log-line-number">${idx + 1}</span>` +
        `<span class="log-line-content">${ansiToHtml(line)}</span></div>`;
}

function logViewer(content, title) {
    const id = 'viewer-' + (viewerCounter++);
    const lines = String(content || '').split('\n');
    if (lines.length > 1 && lines[lines.length - 1] === '') lines.pop();
    const counts = { error: 0, warning: 0, info: 0, debug: 0 };
    lines.forEach(line => counts[logLevel(stripAnsi(line))]++);
    const levels = LOG_LEVELS.map(level => `
        <label><input type="checkbox" data-level="${level}" checked> ${level}
            <span class="filter-count" data-level="${level}">${counts[level]}</span></label>`).join('');
    return `
        <div class="log-controls">
            <input type="text" class="filter-input" id="${id}-search" placeholder="Search log..."
                oninput="performSearch('${id}')" onkeydown="searchKey(event, '${id}')">
            <button class="btn" onclick="prevSearchResult('${id}')" title="Previous match">&uarr;</button>
            <button class="btn" onclick="nextSearchResult('${id}')" title="Next match">&darr;</button>
            <span class="subtle" id="${id}-counter">0/0</span>
            <span class="log-filters">
                <button class="btn" onclick="toggleFiltersMenu('${id}')">Levels</button>
                <div class="log-filters-menu" id="${id}-filters">${levels}
                    <div class="log-filters-actions">
                        <button class="btn" onclick="applyFilters('${id}')">Apply</button>
                        <button class="btn" onclick="resetFilters('${id}')">Reset</button>
                    </div>
                </div>
            </span>
            <button class="btn" onclick="jumpToPrevError('${id}')">Prev error</button>
            <button class="btn" id="${id}-next-error" onclick="jumpToNextError('${id}')">Next error (${counts.error})</button>
            <button class="btn" onclick="jumpToTop('${id}')">Top</button>
            <button class="btn" onclick="jumpToBottom('${id}')">Bottom</button>
            <button class="btn" onclick="zoom('${id}', -1)" title="Smaller text">A-</button>
            <span class="subtle" id="${id}-zoom">100%</span>
            <button class="btn" onclick="zoom('${id}', 1)" title="Larger text">A+</button>
            <button class="btn" onclick="toggleWrap('${id}')">Wrap</button>
            <button class="btn" onclick="copyLog('${id}')">Copy</button>
            <button class="btn" onclick="downloadLog('${id}')">Download</button>
        </div>
        <div class="log-view" id="${id}" data-title="${escapeHtml(title)}">${lines.map(logLineHtml).join('')}</div>`;
}

function logLines(id) {
    return Array.from(document.querySelectorAll(`#${id} .log-line`));
}

function logText(id) {
    return logLines(id).map(line => line.querySelector('.log-line-content').textContent).join('\n');
}

function scrollToLine(viewer, line) {
    if (!viewer || !line) return;
    viewer.scrollTop = Math.max(line.offsetTop - 40, 0);
    line.classList.add('flash');
    setTimeout(() => line.classList.remove('flash'), 1500);
}

// Search
function performSearch(id) {
    const viewer = document.getElementById(id);
    const state = logState(id);
    const contents = Array.from(viewer.querySelectorAll('.log-line-content'));
    if (state.original === null) state.original = contents.map(c => c.innerHTML);
    contents.forEach((c, i) => { c.innerHTML = state.original[i]; });
    state.matches = [];
    state.matchIdx = -1;

    const needle = document.getElementById(id + '-search').value.trim().toLowerCase();
    if (needle) {
        contents.forEach(c => {
            const text = c.textContent;
            const lower = text.toLowerCase();
            let from = 0;
            let at;
            let html = '';
            while ((at = lower.indexOf(needle, from)) !== -1) {
                html += escapeHtml(text.slice(from, at)) +
                    `<mark class="search-hit">${escapeHtml(text.slice(at, at + needle.length))}</mark>`;
                from = at + needle.length;
            }
            if (from > 0) c.innerHTML = html + escapeHtml(text.slice(from));
        });
        state.matches = Array.from(viewer.querySelectorAll('mark.search-hit'));
    }
    if (state.matches.length > 0) showMatch(id, 0);
    else updateSearchCounter(id);
}

function showMatch(id, idx) {
    const state = logState(id);
    state.matches.forEach(m => m.classList.remove('current'));
    state.matchIdx = idx;
    const mark = state.matches[idx];
    mark.classList.add('current');
    scrollToLine(document.getElementById(id), mark.closest('.log-line'));
    updateSearchCounter(id);
}

function nextSearchResult(id) {
    const state = logState(id);
    if (state.matches.length === 0) return;
    showMatch(id, (state.matchIdx + 1) % state.matches.length);
}

function prevSearchResult(id) {
    const state = logState(id);
    if (state.matches.length === 0) return;
    showMatch(id, state.matchIdx <= 0 ? state.matches.length - 1 : state.matchIdx - 1);
}

function updateSearchCounter(id) {
    const state = logState(id);
    const total = state.matches.length;
    document.getElementById(id + '-counter').textContent = total ? `${state.matchIdx + 1}/${total}` : '0/0';
}

function searchKey(event, id) {
    if (event.key !== 'Enter') return;
    event.preventDefault();
    if (event.shiftKey) prevSearchResult(id);
    else nextSearchResult(id);
}

// Level filters
function toggleFiltersMenu(id) {
    const menu = document.getElementById(id + '-filters');
    const opening = !menu.classList.contains('show');
    document.querySelectorAll('.log-filters-menu.show').forEach(m => m.classList.remove('show'));
    if (opening) {
        countLogLevels(id);
        menu.classList.add('show');
    }
}

function countLogLevels(id) {
    const counts = { error: 0, warning: 0, info: 0, debug: 0 };
    logLines(id).forEach(line => counts[line.dataset.level]++);
    document.querySelectorAll(`#${id}-filters .filter-count`).forEach(span => {
        span.textContent = counts[span.dataset.level];
    });
    return counts;
}

function applyFilters(id) {
    const enabled = {};
    document.querySelectorAll(`#${id}-filters input[type=checkbox]`).forEach(cb => {
        enabled[cb.dataset.level] = cb.checked;
    });
    logLines(id).forEach(line => line.classList.toggle('hidden', !enabled[line.dataset.level]));
    const state = logState(id);
    state.errors = null;
    state.errorIdx = -1;
    document.getElementById(id + '-filters').classList.remove('show');
}

function resetFilters(id) {
    document.querySelectorAll(`#${id}-filters input[type=checkbox]`).forEach(cb => { cb.checked = true; });
    applyFilters(id);
}

document.addEventListener('click', e => {
    if (!e.target.closest('.log-filters')) {
        document.querySelectorAll('.log-filters-menu.show').forEach(m => m.classList.remove('show'));
    }
});

// Error navigation
function findErrorsInLog(id) {
    return logLines(id).filter(line => line.dataset.level === 'error' && !line.classList.contains('hidden'));
}

function navigateErrors(id, step) {
    const state = logState(id);
    if (state.errors === null) state.errors = findErrorsInLog(id);
    const total = state.errors.length;
    if (total === 0) {
        showNotification('No errors found in log', 'warning');
        return;
    }
    if (step > 0) state.errorIdx = (state.errorIdx + 1) % total;
    else state.errorIdx = state.errorIdx <= 0 ? total - 1 : state.errorIdx - 1;
    scrollToLine(document.getElementById(id), state.errors[state.errorIdx]);
    document.getElementById(id + '-next-error').textContent = `Next error (${state.errorIdx + 1}/${total})`;
}

function jumpToNextError(id) { navigateErrors(id, 1); }
function jumpToPrevError(id) { navigateErrors(id, -1); }
function jumpToTop(id) { document.getElementById(id).scrollTop = 0; }
function jumpToBottom(id) {
    const viewer = document.getElementById(id);
    viewer.scrollTop = viewer.scrollHeight;
}

// Display & export
function zoom(id, delta) {
    const state = logState(id);
    const next = state.font + delta;
    if (next < 0 || next >= LOG_ZOOM_STEPS.length) return;
    state.font = next;
    document.getElementById(id).style.fontSize = (12 * LOG_ZOOM_STEPS[next] / 100) + 'px';
    document.getElementById(id + '-zoom').textContent = LOG_ZOOM_STEPS[next] + '%';
}

function toggleWrap(id) {
    document.getElementById(id).classList.toggle('wrap');
}

function copyLog(id) {
    const viewer = document.getElementById(id);
    copyToClipboard(logText(id), `${viewer.dataset.title} copied`);
}

function downloadLog(id) {
    const viewer = document.getElementById(id);
    const base = (viewer.dataset.title || 'log').split('/').pop().replace(/[^A-Za-z0-9._-]+/g, '_');
    const filename = /\.(log|txt)$/.test(base) ? base : base + '.log';
    const url = URL.createObjectURL(new Blob([logText(id)], { type: 'text/plain' }));
    const link = document.createElement('a');
    link.href = url;
    link.download = filename;
    document.body.appendChild(link);
    link.click();
    link.remove();
    URL.revokeObjectURL(url);
    showNotification(`Downloaded ${filename}`);
}

// pprof text profiles
const PPROF_FRAME = /^#\s+0x[0-9a-f]+\s+(.+?)(?:\s+\/|$)/;

function isPprofFile(name) {
    return name.includes('pprof-heap') || name.includes('pprof-goroutine');
}

function parsePprofHeap(content) {
    const lines = String(content || '').split('\n');
    const result = { liveObjects: 0, liveSize: 0, totalObjects: 0, totalSize: 0, entries: [] };
    const header = (lines[0] || '').match(/heap profile: (\d+): (\d+) \[(\d+): (\d+)\]/);
    if (header) {
        [result.liveObjects, result.liveSize, result.totalObjects, result.totalSize] =
            header.slice(1, 5).map(Number);
    }
    let entry = null;
    for (const line of lines.slice(1)) {
        const head = line.match(/^(\d+): (\d+) \[(\d+): (\d+)\] @/);
        if (head) {
            if (entry) result.entries.push(entry);
            const [liveObjects, liveSize, totalObjects, totalSize] = head.slice(1, 5).map(Number);
            entry = { liveObjects, liveSize, totalObjects, totalSize, stack: [] };
            continue;
        }
        const frame = line.match(PPROF_FRAME);
        if (frame && entry) entry.stack.push(frame[1].trim());
    }
    if (entry) result.entries.push(entry);
    result.entries.sort((a, b) => b.liveSize - a.liveSize);
    return result;
}

function parsePprofGoroutine(content) {
    const lines = String(content || '').split('\n');
    const header = (lines[0] || '').match(/goroutine profile: total (\d+)/);
    const result = { totalGoroutines: header ? Number(header[1]) : 0, stacks: [] };
    let stack = null;
    for (const line of lines.slice(1)) {
        const head = line.match(/^(\d+) @/);
        if (head) {
            if (stack) result.stacks.push(stack);
            stack = { count: Number(head[1]), frames: [] };
            continue;
        }
        const frame = line.match(PPROF_FRAME);
        if (frame && stack) stack.frames.push(frame[1].trim());
    }
    if (stack) result.stacks.push(stack);
    result.stacks.sort((a, b) => b.count - a.count);
    return result;
}

function formatBytes(bytes) {
    if (!bytes || bytes <= 0) return '0 B';
    const units = ['B', 'KB', 'MB', 'GB', 'TB'];
    const i = Math.min(Math.floor(Math.log(bytes) / Math.log(1024)), units.length - 1);
    return `${parseFloat((bytes / Math.pow(1024, i)).toFixed(2))} ${units[i]}`;
}

function shortFrame(frame) {
    return frame.split('.').pop() || frame;
}

function pprofHelp(text) {
    return `<button class="btn pprof-help-btn" onclick="this.nextElementSibling.classList.toggle('visible')">Help</button>
        <div class="pprof-help-popup">${text}</div>`;
}

function renderPprofHeap(parsed) {
    const top = parsed.entries.slice(0, 8);
    const max = (top[0] && top[0].liveSize) || 1;
    const bars = top.map(entry => {
        const name = entry.stack[0] || 'unknown';
        const pct = (entry.liveSize / max * 100).toFixed(0);
        return `<div class="pprof-bar-item">
            <div class="pprof-bar-label" title="${escapeHtml(name)}">${escapeHtml(shortFrame(name))}</div>
            <div class="pprof-bar-container">
                <div class="pprof-bar" style="width: ${pct}%;"></div>
                <span class="pprof-bar-value">${formatBytes(entry.liveSize)}</span>
            </div>
        </div>`;
    }).join('');
    return `<div class="pprof-header">
            <div class="pprof-stats">
                <span><strong>${formatBytes(parsed.liveSize)}</strong> live</span>
                <span><strong>${parsed.liveObjects.toLocaleString()}</strong> objects</span>
                <span><strong>${formatBytes(parsed.totalSize)}</strong> total allocated</span>
            </div>
            ${pprofHelp('Live memory is allocated and still in use. Bars show the functions holding the most live memory. For deeper analysis run <code>go tool pprof</code> on the binary profile.')}
        </div>
        <div class="pprof-bars">${bars || '<p class="subtle">No allocation samples.</p>'}</div>`;
}

function renderPprofGoroutine(parsed) {
    const stacks = parsed.stacks.slice(0, 12).map(stack => {
        const top = stack.frames[0] || 'unknown';
        const frames = stack.frames.map(f => `<div class="pprof-frame">${escapeHtml(f)}</div>`).join('');
        return `<div class="pprof-stack-item">
            <div class="pprof-stack-header" onclick="this.parentElement.classList.toggle('expanded')">
                <span class="pprof-stack-count">${stack.count}x</span>
                <span class="pprof-stack-name" title="${escapeHtml(top)}">${escapeHtml(shortFrame(top))}</span>
                <span class="pprof-stack-toggle">▶</span>
            </div>
            <div class="pprof-stack-frames">${frames}</div>
        </div>`;
    }).join('');
    return `<div class="pprof-header">
            <div class="pprof-stats">
                <span><strong>${parsed.totalGoroutines}</strong> goroutines</span>
                <span><strong>${parsed.stacks.length}</strong> unique stacks</span>
            </div>
            ${pprofHelp('Each row groups goroutines with the same stack. High counts can point at leaks or at goroutines blocked on channels and locks. Click a row for the full stack.')}
        </div>
        <div class="pprof-stacks">${stacks || '<p class="subtle">No goroutine stacks.</p>'}</div>`;
}

function pprofSection(name, content) {
    const rawId = 'pprof-raw-' + (viewerCounter++);
    const heap = name.includes('pprof-heap');
    const summary = heap
        ? renderPprofHeap(parsePprofHeap(content))
        : renderPprofGoroutine(parsePprofGoroutine(content));
    return `<div class="pprof-section">
            <div class="pprof-section-title">${heap ? 'Heap Profile' : 'Goroutine Profile'}
                <span class="subtle">(${escapeHtml(name)})</span></div>
            ${summary}
            <button class="btn pprof-raw-toggle" onclick="togglePprofRaw(this, '${rawId}')">Show raw output</button>
            <div id="${rawId}" class="pprof-raw-content">${logViewer(content, name)}</div>
        </div>`;
}

function togglePprofRaw(button, rawId) {
    const raw = document.getElementById(rawId);
    raw.classList.toggle('visible');
    button.textContent = raw.classList.contains('visible') ? 'Hide raw output' : 'Show raw output';
}

// Modals
function openModal(id, title, body) {
    document.getElementById(id + 'Title').textContent = title;
    document.getElementById(id + 'Body').innerHTML = body;
    document.getElementById(id).classList.add('open');
}

function closeModal(id) {
    document.getElementById(id).classList.remove('open');
}

function switchModalTab(button, tabId) {
    const modal = button.closest('.modal-body');
    modal.querySelectorAll('.modal-tab').forEach(b => b.classList.toggle('active', b === button));
    modal.querySelectorAll('.modal-tab-content').forEach(c => c.classList.toggle('active', c.id === tabId));
}

function artifactsHtml(meta) {
    if (!meta) return '<p class="subtle">No artifacts collected for this test.</p>';
    const files = meta.file_contents || {};
    const names = Object.keys(files);
    let html = `<dl class="kv">
        <dt>Directory</dt><dd><code>${escapeHtml(meta.relative_path)}</code></dd>
        <dt>Namespace</dt><dd>${escapeHtml(meta.namespace || '-')}</dd>
        <dt>Pods</dt><dd>${escapeHtml((meta.artifacts || {}).pod_count || 0)}</dd>
    </dl>`;
    if (names.length === 0) return html + '<p class="subtle">No artifact files.</p>';
    const profiles = names.filter(name => isPprofFile(name) && files[name].type !== 'error');
    for (const name of profiles) html += pprofSection(name, files[name].content);
    for (const name of names.filter(name => !profiles.includes(name))) {
        const file = files[name];
        let note = '';
        if (file.type === 'log' && file.truncated) note = ` (last lines of ${file.total_lines})`;
        if (file.type === 'error') {
            html += `<details class="file-block" open><summary>${escapeHtml(name)} - error</summary>
                <div class="failure-box">${escapeHtml(file.content)}</div></details>`;
            continue;
        }
        html += `<details class="file-block"><summary>${escapeHtml(name)} <span class="subtle">[${escapeHtml(file.type)}]${note}</span></summary>
            ${logViewer(file.content, name)}</details>`;
    }
    return html;
}

function showTestDetails(rowIdx, runIdx) {
    const row = window.pivotData[rowIdx];
    const run = window.runsData[runIdx];
    const cell = row.runs[run.run_id];
    if (!cell) return;
    const failure = cell.failure_message
        ? `<h4>Failure</h4><div class="failure-box">${ansiToHtml(cell.failure_message)}</div>`
        : '';
    const body = `
        <div class="modal-tabs">
            <button class="modal-tab active" onclick="switchModalTab(this, 'tab-summary')">Summary</button>
            <button class="modal-tab" onclick="switchModalTab(this, 'tab-artifacts')">Artifacts</button>
        </div>
        <div id="tab-summary" class="modal-tab-content active">
            <dl class="kv">
                <dt>Run</dt><dd>${escapeHtml(run.run_id)} (${escapeHtml(run.date)})</dd>
                <dt>State</dt><dd><span class="badge ${stateClass(cell.state)}">${escapeHtml(cell.state)}</span></dd>
                <dt>Runtime</dt><dd>${cell.runtime.toFixed(2)}s</dd>
                <dt>Labels</dt><dd>${escapeHtml((cell.labels || []).join(', ') || '-')}</dd>
                <dt>History</dt><dd>${row.pass_count} passed, ${row.fail_count} failed of ${row.total_runs}</dd>
            </dl>
            ${failure}
        </div>
        <div id="tab-artifacts" class="modal-tab-content">${artifactsHtml(cell.artifact_metadata)}</div>`;
    openModal('testModal', row.test_name, body);
}

function showRowDetails(rowIdx) {
    const row = window.pivotData[rowIdx];
    const history = window.runsData.map((run, idx) => {
        const cell = row.runs[run.run_id];
        if (!cell) return '';
        return `<span class="badge ${stateClass(cell.state)}" style="cursor:pointer" title="Run ${escapeHtml(run.run_id)}"
            onclick="showTestDetails(${rowIdx}, ${idx})">${escapeHtml(run.run_id)}</span>`;
    }).join('');
    const body = `
        <dl class="kv">
            <dt>Flakiness</dt><dd>${row.flakiness_score.toFixed(0)}% (${escapeHtml(row.flakiness_pattern)}: ${patternDescription(row.flakiness_pattern)})</dd>
            <dt>Pass rate</dt><dd>${row.pass_rate.toFixed(1)}% (${row.pass_count}/${row.total_runs})</dd>
            <dt>Runtime</dt><dd>avg ${row.avg_runtime.toFixed(1)}s, min ${row.min_runtime.toFixed(1)}s, max ${row.max_runtime.toFixed(1)}s</dd>
        </dl>
        <h4>Run history (newest first)</h4>
        <div class="history">${history}</div>`;
    openModal('testModal', row.test_name, body);
}

function showRunDetails(runIdx) {
    const run = window.runsData[runIdx];
    const env = Object.entries(run.environment || {})
        .map(([k, v]) => `<dt>${escapeHtml(k)}</dt><dd>${escapeHtml(typeof v === 'string' ? v : JSON.stringify(v))}</dd>`)
        .join('');
    const body = `
        <dl class="kv">
            <dt>Started</dt><dd>${escapeHtml(run.start_time)}</dd>
            <dt>Tests</dt><dd>${run.total_tests} total, ${run.passed_tests} passed, ${run.failed_tests} failed</dd>
            <dt>Runtime</dt><dd>${formatDuration(run.total_runtime)}</dd>
            <dt>Branch</dt><dd>${escapeHtml(run.git_branch || 'unknown')}${run.git_dirty ? ' (dirty)' : ''}</dd>
            <dt>Commit</dt><dd><code>${escapeHtml(run.git_commit || 'unknown')}</code></dd>
            ${run.description ? `<dt>Description</dt><dd>${escapeHtml(run.description)}</dd>` : ''}
        </dl>
        ${env ? `<h4>Environment</h4><dl class="kv">${env}</dl>` : ''}
        <h4>Console output</h4>
        ${run.test_output_log ? logViewer(run.test_output_log, 'Log') : '<p class="subtle">No console log captured.</p>'}`;
    openModal('runModal', `Run ${run.run_id}`, body);
}

// Charts
function renderCharts() {
    if (typeof Chart === 'undefined') return;
    const options = { responsive: true, maintainAspectRatio: false };
    new Chart(document.getElementById('passRateChart'), { type: 'line', data: window.chartData.passRate, options });
    new Chart(document.getElementById('durationChart'), { type: 'line', data: window.chartData.duration, options });
}

// Comparison
function runIndex(runId) {
    return window.runsData.findIndex(r => r.run_id === runId);
}

function runInfoHtml(run) {
    const rate = run.total_tests > 0 ? (run.passed_tests / run.total_tests * 100).toFixed(1) : '0.0';
    return `
        <div><strong>Run ID:</strong> ${escapeHtml(run.run_id)}</div>
        <div><strong>Date:</strong> ${escapeHtml(run.date)}</div>
        <div><strong>Total Tests:</strong> ${run.total_tests}</div>
        <div><strong>Passed:</strong> <span class="rate-high">${run.passed_tests}</span></div>
        <div><strong>Failed:</strong> <span class="rate-low">${run.failed_tests}</span></div>
        <div><strong>Pass Rate:</strong> ${rate}%</div>`;
}

function updateRunInfo() {
    const a = document.getElementById('runASelect');
    const b = document.getElementById('runBSelect');
    if (!a || !b) return;
    document.getElementById('runAInfo').innerHTML = runInfoHtml(window.runsData[Number(a.value)]);
    document.getElementById('runBInfo').innerHTML = runInfoHtml(window.runsData[Number(b.value)]);
}

function comparisonList(items, runIdx, empty, meta) {
    if (items.length === 0) return `<div class="empty-list">${empty}</div>`;
    return items.map(item => `
        <div class="comparison-item" onclick="showTestDetails(${item.rowIdx}, ${runIdx})">
            <div>${escapeHtml(item.row.test_name)}</div>
            <div class="meta">${meta(item)}</div>
        </div>`).join('');
}

function compareRuns() {
    const idxA = Number(document.getElementById('runASelect').value);
    const idxB = Number(document.getElementById('runBSelect').value);
    if (idxA === idxB) {
        showNotification('Please select different runs to compare', 'warning');
        return;
    }
    const runA = window.runsData[idxA].run_id;
    const runB = window.runsData[idxB].run_id;

    const newFailures = [], fixed = [], regressions = [];
    let runtimeA = 0, runtimeB = 0, compared = 0;

    window.pivotData.forEach((row, rowIdx) => {
        const a = row.runs[runA];
        const b = row.runs[runB];
        if (!a || !b) return;
        compared++;
        runtimeA += a.runtime || 0;
        runtimeB += b.runtime || 0;
        const item = { row, rowIdx, runtimeA: a.runtime, runtimeB: b.runtime };
        if (a.state === 'passed' && b.state === 'failed') newFailures.push(item);
        if (a.state === 'failed' && b.state === 'passed') fixed.push(item);
        if (row.is_flaky && b.state === 'failed' && row.fail_count > 1) regressions.push(item);
    });

    const diff = runtimeB - runtimeA;
    const pct = runtimeA > 0 ? (diff / runtimeA * 100) : 0;
    const sign = diff > 0 ? '+' : '';
    const cls = diff > 0 ? 'trend-down' : diff < 0 ? 'trend-up' : 'trend-flat';

    document.getElementById('comparisonSummary').style.display = 'grid';
    document.getElementById('testsComparedCount').textContent = compared;
    document.getElementById('newFailuresCount').textContent = newFailures.length;
    document.getElementById('fixedTestsCount').textContent = fixed.length;
    document.getElementById('regressionsCount').textContent = regressions.length;
    document.getElementById('runtimeDiff').innerHTML =
        `<span class="${cls}">${sign}${diff.toFixed(1)}s (${sign}${pct.toFixed(1)}%)</span>`;

    const runtimeMeta = item => `Runtime: ${item.runtimeA.toFixed(2)}s → ${item.runtimeB.toFixed(2)}s`;
    document.getElementById('newFailuresList').innerHTML =
        comparisonList(newFailures, idxB, 'No new failures', runtimeMeta);
    document.getElementById('fixedTestsList').innerHTML =
        comparisonList(fixed, idxB, 'No fixed tests', runtimeMeta);
    document.getElementById('regressionsList').innerHTML =
        comparisonList(regressions, idxB, 'No regressions detected',
            item => `Flakiness: ${item.row.flakiness_score.toFixed(0)}% | Fails: ${item.row.fail_count}/${item.row.total_runs}`);
}

document.addEventListener('keydown', e => {
    if (e.key === 'Escape') document.querySelectorAll('.modal.open').forEach(m => m.classList.remove('open'));
});

document.addEventListener('DOMContentLoaded', () => {
    const saved = localStorage.getItem('theme') ||
        (window.matchMedia('(prefers-color-scheme: dark)').matches ? 'dark' : 'light');
    applyTheme(saved);
    renderCharts();
    updateRunInfo();
});
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn icons_render_with_size_and_color() {
        let svg = icon("copy", 12, "#f59e0b");
        assert!(svg.starts_with("<svg width=\"12\" height=\"12\""));
        assert!(svg.contains("stroke=\"#f59e0b\""));
        assert!(icon("nope", 12, "red").is_empty());
    }

    #[test]
    fn script_defines_entry_points() {
        for name in [
            "function filterTable",
            "function compareRuns",
            "function showTestDetails",
            "function showRunDetails",
            "function copyAllTestNames",
        ] {
            assert!(JS.contains(name), "missing {name}");
        }
        assert!(!JS.contains("</script"));
    }

    #[test]
    fn log_viewer_supports_search_levels_and_error_jumps() {
        for name in [
            "function performSearch",
            "function nextSearchResult",
            "function prevSearchResult",
            "function updateSearchCounter",
            "function countLogLevels",
            "function applyFilters",
            "function resetFilters",
            "function findErrorsInLog",
            "function jumpToNextError",
            "function jumpToPrevError",
            "function jumpToTop",
            "function jumpToBottom",
            "function zoom",
            "function downloadLog",
        ] {
            assert!(JS.contains(name), "missing {name}");
        }
        assert!(CSS.contains(".log-line-number"));
        assert!(CSS.contains("mark.search-hit.current"));
    }

    #[test]
    fn pprof_profiles_get_their_own_view() {
        for name in [
            "function isPprofFile",
            "function parsePprofHeap",
            "function parsePprofGoroutine",
            "function formatBytes",
            "function renderPprofHeap",
            "function renderPprofGoroutine",
            "function togglePprofRaw",
        ] {
            assert!(JS.contains(name), "missing {name}");
        }
        assert!(JS.contains("isPprofFile(name) && files[name].type !== 'error'"));
        for class in [".pprof-bar", ".pprof-stack-frames", ".pprof-raw-content.visible"] {
            assert!(CSS.contains(class), "missing {class}");
        }
    }

    #[test]
    fn log_handlers_only_receive_the_viewer_id() {
        // File names reach the page through data-title, never inside an inline handler.
        assert!(JS.contains(r#"data-title="${escapeHtml(title)}""#));
        assert!(JS.contains("onclick=\"copyLog('${id}')\""));
        assert!(!JS.contains("escapeHtml(title)} copied"));
        for line in JS.lines().filter(|line| line.contains("onclick=")) {
            assert!(
                !line.contains("(title)") && !line.contains("(name)"),
                "file name interpolated into handler: {line}"
            );
        }
    }
}
