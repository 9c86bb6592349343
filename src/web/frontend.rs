//! Embedded HTML/CSS/JS dashboard page.
//!
//! Compiled into the binary as a string constant: no external assets, no
//! build tools, no CDN. The page polls `/api/dashboard` and draws the chart
//! paths the server computes.

/// The complete single-page dashboard HTML.
pub const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="pt-BR">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Wave Pagamentos</title>
<style>
:root {
  --bg: #f6f7fb;
  --surface: #ffffff;
  --border: #e5e7eb;
  --text: #111827;
  --text-muted: #6b7280;
  --accent: #2563eb;
  --green: #16a34a;
  --yellow: #ca8a04;
  --red: #dc2626;
  --purple: #7c3aed;
  --radius: 12px;
  --font: -apple-system, BlinkMacSystemFont, 'Segoe UI', Helvetica, Arial, sans-serif;
}

* { margin: 0; padding: 0; box-sizing: border-box; }
body { background: var(--bg); color: var(--text); font-family: var(--font); font-size: 14px; }
.app { max-width: 1200px; margin: 0 auto; padding: 24px; }

header { display: flex; justify-content: space-between; align-items: center; margin-bottom: 24px; }
header h1 { font-size: 22px; }
header h1 span { color: var(--accent); }
header .tick { color: var(--text-muted); font-size: 12px; }

nav { display: flex; gap: 8px; margin-bottom: 20px; }
nav button { border: 1px solid var(--border); background: var(--surface); padding: 8px 14px; border-radius: 8px; cursor: pointer; }
nav button.active { background: var(--accent); color: #fff; border-color: var(--accent); }

.grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(240px, 1fr)); gap: 16px; }
.card { background: var(--surface); border: 1px solid var(--border); border-radius: var(--radius); padding: 18px; }
.card h3 { font-size: 13px; color: var(--text-muted); font-weight: 500; }
.card .value { font-size: 24px; font-weight: 700; margin: 6px 0; }
.growth { font-size: 12px; color: var(--green); }
.growth.down { color: var(--red); }

.charts { display: grid; grid-template-columns: repeat(auto-fit, minmax(320px, 1fr)); gap: 16px; margin-top: 16px; }
svg path.stroke { fill: none; stroke-width: 2; }
svg path.fill { opacity: 0.15; }

table { width: 100%; border-collapse: collapse; margin-top: 8px; }
th, td { text-align: left; padding: 8px; border-bottom: 1px solid var(--border); }
th { color: var(--text-muted); font-weight: 500; font-size: 12px; }
.status { padding: 2px 8px; border-radius: 999px; font-size: 12px; }
.status.approved, .status.active { background: #dcfce7; color: var(--green); }
.status.pending, .status.paused { background: #fef9c3; color: var(--yellow); }
.status.rejected, .status.inactive { background: #fee2e2; color: var(--red); }
.status.draft { background: #ede9fe; color: var(--purple); }

.toolbar { display: flex; gap: 8px; margin: 12px 0; }
input, select, textarea { border: 1px solid var(--border); border-radius: 8px; padding: 8px; font: inherit; }
textarea { width: 100%; min-height: 60px; }
button.small { border: 1px solid var(--border); background: var(--surface); border-radius: 6px; padding: 4px 8px; cursor: pointer; font-size: 12px; }
pre.ai { white-space: pre-wrap; background: var(--bg); padding: 12px; border-radius: 8px; margin-top: 12px; min-height: 80px; }
.hidden { display: none; }
</style>
</head>
<body>
<div class="app">
  <header>
    <h1><span>Wave</span> Pagamentos</h1>
    <div class="tick" id="tick"></div>
  </header>

  <nav>
    <button data-tab="overview" class="active">Visão Geral</button>
    <button data-tab="funnels">Funis de Vendas</button>
    <button data-tab="flows">Fluxos de Conversa</button>
    <button data-tab="waveai">Wave IA</button>
  </nav>

  <section id="tab-overview">
    <div class="grid" id="cards"></div>
    <div class="charts">
      <div class="card"><h3>Receita (24h)</h3><svg viewBox="0 0 300 120" width="100%" height="140"><path class="fill" id="rev-area" fill="#2563eb"/><path class="stroke" id="rev-line" stroke="#2563eb"/></svg></div>
      <div class="card"><h3>Vendas (24h)</h3><svg viewBox="0 0 300 120" width="100%" height="140"><path class="fill" id="sales-area" fill="#16a34a"/><path class="stroke" id="sales-line" stroke="#16a34a"/></svg></div>
    </div>
    <div class="card" style="margin-top:16px">
      <h3>Vendas Recentes</h3>
      <table><thead><tr><th>Produto</th><th>Cliente</th><th>Valor</th><th>Status</th><th>Afiliado</th><th>Data</th></tr></thead><tbody id="sales"></tbody></table>
    </div>
  </section>

  <section id="tab-funnels" class="hidden">
    <div class="toolbar">
      <input id="funnel-q" placeholder="Buscar funis...">
      <select id="funnel-status"><option value="all">Todos</option><option value="active">Ativos</option><option value="paused">Pausados</option><option value="draft">Rascunhos</option></select>
      <input id="funnel-name" placeholder="Nome do novo funil">
      <button class="small" id="funnel-create">Criar Funil</button>
    </div>
    <div class="card"><table><thead><tr><th>Nome</th><th>Status</th><th>Visitantes</th><th>Conversões</th><th>Taxa</th><th></th></tr></thead><tbody id="funnels"></tbody></table></div>
  </section>

  <section id="tab-flows" class="hidden">
    <div class="toolbar">
      <input id="flow-q" placeholder="Buscar fluxos...">
      <select id="flow-status"><option value="all">Todos</option><option value="active">Ativos</option><option value="paused">Pausados</option><option value="draft">Rascunhos</option></select>
      <input id="flow-name" placeholder="Nome do novo fluxo">
      <button class="small" id="flow-create">Criar Fluxo</button>
    </div>
    <div class="card"><table><thead><tr><th>Nome</th><th>Plataforma</th><th>Status</th><th>Mensagens</th><th>Conversões</th><th></th></tr></thead><tbody id="flows"></tbody></table></div>
  </section>

  <section id="tab-waveai" class="hidden">
    <div class="card">
      <div class="toolbar">
        <select id="ai-category"><option value="copy">Copy</option><option value="strategy">Estratégia</option></select>
        <select id="ai-copy-type">
          <option value="headline">Headline</option><option value="email">Email</option><option value="vsl">VSL</option>
          <option value="landing">Landing Page</option><option value="ads">Anúncios</option><option value="checkout">Checkout</option>
        </select>
      </div>
      <div class="toolbar">
        <input id="ai-name" placeholder="Nome do produto">
        <input id="ai-price" placeholder="Preço">
        <input id="ai-target" placeholder="Público-alvo">
      </div>
      <textarea id="ai-description" placeholder="Descrição do produto"></textarea>
      <textarea id="ai-prompt" placeholder="Sua pergunta"></textarea>
      <button class="small" id="ai-generate">Gerar</button>
      <pre class="ai" id="ai-output"></pre>
    </div>
  </section>
</div>

<script>
const $ = (id) => document.getElementById(id);
const esc = (s) => String(s ?? '').replace(/[&<>"]/g, (c) => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;' }[c]));

async function api(method, url, body) {
  const res = await fetch(url, {
    method,
    headers: { 'Content-Type': 'application/json' },
    body: body === undefined ? undefined : JSON.stringify(body),
  });
  const data = await res.json();
  if (!res.ok) throw new Error(data.error || res.statusText);
  return data;
}

document.querySelectorAll('nav button').forEach((btn) => {
  btn.addEventListener('click', () => {
    document.querySelectorAll('nav button').forEach((b) => b.classList.toggle('active', b === btn));
    document.querySelectorAll('section').forEach((s) => s.classList.toggle('hidden', s.id !== 'tab-' + btn.dataset.tab));
    if (btn.dataset.tab === 'funnels') loadFunnels();
    if (btn.dataset.tab === 'flows') loadFlows();
  });
});

function card(title, value, growth, spark, color) {
  const down = growth.startsWith('↓') ? ' down' : '';
  return `<div class="card"><h3>${title}</h3><div class="value">${esc(value)}</div>
    <div class="growth${down}">${esc(growth)}</div>
    <svg viewBox="0 0 120 40" width="120" height="40"><path class="stroke" d="${spark}" stroke="${color}"/></svg></div>`;
}

async function loadDashboard() {
  const d = await api('GET', '/api/dashboard');
  const f = d.formatted;
  $('cards').innerHTML =
    card('Receita Hoje', f.revenue, f.revenue_growth, d.charts.revenue.sparkline, '#2563eb') +
    card('Vendas', f.sales_count, f.sales_growth, d.charts.sales.sparkline, '#16a34a') +
    card('Afiliados Ativos', f.active_affiliates, f.affiliates_growth, d.charts.sales.sparkline, '#7c3aed') +
    card('Taxa de Conversão', f.conversion_rate, f.conversion_growth, d.charts.conversion.sparkline, '#ca8a04');
  $('rev-area').setAttribute('d', d.charts.revenue.area);
  $('rev-line').setAttribute('d', d.charts.revenue.smooth);
  $('sales-area').setAttribute('d', d.charts.sales.area);
  $('sales-line').setAttribute('d', d.charts.sales.smooth);
  $('sales').innerHTML = d.recent_sales.map((s) => `<tr><td>${esc(s.product)}</td><td>${esc(s.customer)}</td>
    <td>${esc(s.amount_formatted)}</td><td><span class="status ${s.status}">${s.status}</span></td>
    <td>${esc(s.affiliate || '-')}</td><td>${esc(s.date_formatted)}</td></tr>`).join('');
  $('tick').textContent = 'atualizações: ' + d.ticks;
}

function actions(kind, r) {
  return `<button class="small" onclick="act('POST','/api/${kind}/${r.id}/toggle','${kind}')">${r.status === 'active' ? 'Pausar' : 'Ativar'}</button>
    <button class="small" onclick="act('POST','/api/${kind}/${r.id}/duplicate','${kind}')">Duplicar</button>
    <button class="small" onclick="if (confirm('Tem certeza que deseja excluir?')) act('DELETE','/api/${kind}/${r.id}','${kind}')">Excluir</button>`;
}

async function act(method, url, kind) {
  try { await api(method, url); } catch (e) { alert(e.message); }
  kind === 'funnels' ? loadFunnels() : loadFlows();
}

async function loadFunnels() {
  const q = encodeURIComponent($('funnel-q').value);
  const rows = await api('GET', `/api/funnels?q=${q}&status=${$('funnel-status').value}`);
  $('funnels').innerHTML = rows.map((r) => `<tr><td>${esc(r.name)}</td><td><span class="status ${r.status}">${r.status}</span></td>
    <td>${r.visitors.toLocaleString('pt-BR')}</td><td>${r.conversions}</td><td>${r.conversionRate}%</td><td>${actions('funnels', r)}</td></tr>`).join('');
}

async function loadFlows() {
  const q = encodeURIComponent($('flow-q').value);
  const rows = await api('GET', `/api/flows?q=${q}&status=${$('flow-status').value}`);
  $('flows').innerHTML = rows.map((r) => `<tr><td>${esc(r.name)}</td><td>${r.platform}</td><td><span class="status ${r.status}">${r.status}</span></td>
    <td>${r.messages.toLocaleString('pt-BR')}</td><td>${r.conversions}</td><td>${actions('flows', r)}</td></tr>`).join('');
}

['funnel-q', 'funnel-status'].forEach((id) => $(id).addEventListener('input', loadFunnels));
['flow-q', 'flow-status'].forEach((id) => $(id).addEventListener('input', loadFlows));

$('funnel-create').addEventListener('click', async () => {
  try { await api('POST', '/api/funnels', { name: $('funnel-name').value }); $('funnel-name').value = ''; } catch (e) { alert(e.message); }
  loadFunnels();
});
$('flow-create').addEventListener('click', async () => {
  try { await api('POST', '/api/flows', { name: $('flow-name').value }); $('flow-name').value = ''; } catch (e) { alert(e.message); }
  loadFlows();
});

$('ai-generate').addEventListener('click', async () => {
  const prompt = $('ai-prompt').value;
  const name = $('ai-name').value;
  if (!prompt.trim() && !name) {
    alert('Por favor, escreva uma pergunta ou preencha pelo menos o nome do produto');
    return;
  }
  $('ai-output').textContent = 'Gerando...';
  try {
    const data = await api('POST', '/wave-ai', {
      prompt,
      type: $('ai-category').value,
      copyType: $('ai-copy-type').value,
      context: { name, description: $('ai-description').value, price: $('ai-price').value, target: $('ai-target').value },
    });
    $('ai-output').textContent = data.response;
  } catch (e) {
    $('ai-output').textContent = 'Erro: ' + e.message;
  }
});

loadDashboard();
setInterval(loadDashboard, 5000);
</script>
</body>
</html>
"##;
