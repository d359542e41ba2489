//! Static dashboard page served at the root path.
//!
//! The page drives the JSON control endpoints and reloads the rendered
//! view once the session loop publishes a new sequence number.

pub const INDEX_HTML: &str = r##"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>ERA5 annual means</title>
<style>
  body { font-family: system-ui, sans-serif; margin: 1.5rem; background: #fafafa; color: #222; }
  h1 { font-size: 1.2rem; }
  .layout { display: flex; gap: 2rem; align-items: flex-start; }
  .controls { display: flex; flex-direction: column; gap: 1rem; min-width: 11rem; }
  .control { display: flex; flex-direction: column; gap: 0.25rem; font-size: 0.85rem; }
  img { border: 1px solid #ccc; background: #fff; }
  #status { font-size: 0.8rem; color: #777; min-height: 1em; }
</style>
</head>
<body>
<h1>ERA5 annual means</h1>
<div class="layout">
  <div class="controls">
    <label class="control">variable
      <select id="variable"></select>
    </label>
    <label class="control">year
      <input id="year" type="range">
      <span id="year-value"></span>
    </label>
    <label class="control">colormap
      <select id="colormap"></select>
    </label>
    <p id="status"></p>
  </div>
  <img id="view" alt="rendered view">
</div>
<script>
let seq = 0;

async function fetchControls() {
  const res = await fetch('/api/controls');
  return res.json();
}

function fillSelect(el, options, value) {
  el.innerHTML = '';
  for (const opt of options) {
    const o = document.createElement('option');
    o.value = opt;
    o.textContent = opt;
    if (opt === value) o.selected = true;
    el.appendChild(o);
  }
}

function applyControls(c) {
  fillSelect(document.getElementById('variable'), c.variable_options, c.variable);
  fillSelect(document.getElementById('colormap'), c.colormap_options, c.colormap);
  const year = document.getElementById('year');
  year.min = c.year_min;
  year.max = c.year_max;
  year.value = c.year;
  document.getElementById('year-value').textContent = c.year;
}

function refreshImage(viewSeq) {
  seq = viewSeq;
  document.getElementById('view').src = '/view.png?seq=' + viewSeq;
  document.getElementById('status').textContent = '';
}

async function waitForRender() {
  document.getElementById('status').textContent = 'rendering...';
  for (let i = 0; i < 600; i++) {
    await new Promise(resolve => setTimeout(resolve, 250));
    const c = await fetchControls();
    if (c.view_seq > seq) {
      applyControls(c);
      refreshImage(c.view_seq);
      return;
    }
  }
  document.getElementById('status').textContent = 'render did not complete';
}

async function post(control, value) {
  await fetch('/api/controls/' + control, {
    method: 'POST',
    headers: {'content-type': 'application/json'},
    body: JSON.stringify({value: value}),
  });
  waitForRender();
}

document.getElementById('variable').addEventListener('change', e => post('variable', e.target.value));
document.getElementById('colormap').addEventListener('change', e => post('colormap', e.target.value));
document.getElementById('year').addEventListener('input', e => {
  document.getElementById('year-value').textContent = e.target.value;
});
document.getElementById('year').addEventListener('change', e => post('year', parseInt(e.target.value, 10)));

(async () => {
  const c = await fetchControls();
  applyControls(c);
  if (c.view_seq > 0) {
    refreshImage(c.view_seq);
  }
})();
</script>
</body>
</html>
"##;
