//! Control page served at `/`

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Flight Panels</title>
<style>
  body { font-family: sans-serif; background: #1e1e1e; color: #ddd; margin: 2em; }
  fieldset { border: 1px solid #444; margin-bottom: 1em; }
  input { width: 6em; background: #111; color: #0f0; border: 1px solid #444; font-family: monospace; }
  button { margin-left: 0.5em; }
  pre { background: #111; padding: 1em; max-height: 20em; overflow: auto; }
</style>
</head>
<body>
<h1>Flight Panels</h1>
<button onclick="post('/api/connect', {})">Connect panels</button>
<button onclick="show('/api/status')">Status</button>
<button onclick="show('/api/events')">Recent events</button>

<fieldset><legend>Radio</legend>
  COM1 <input id="com1Active" value="118.00"> <input id="com1Standby" value="118.50">
  COM2 <input id="com2Active" value="121.30"> <input id="com2Standby" value="121.90">
  <button onclick="post('/api/radio/set', values(['com1Active','com1Standby','com2Active','com2Standby']))">Set</button>
</fieldset>

<fieldset><legend>Multi</legend>
  <input id="topRow" value="250"> <input id="bottomRow" value="3000">
  LEDs <input id="leds" value="1">
  <button onclick="post('/api/multi/set', {topRow: val('topRow'), bottomRow: val('bottomRow'), leds: Number(val('leds'))})">Set</button>
</fieldset>

<fieldset><legend>Switch</legend>
  <button onclick="post('/api/switch/set', {greenN: true, greenL: true, greenR: true})">Gear down</button>
  <button onclick="post('/api/switch/set', {redN: true, redL: true, redR: true})">Gear up</button>
  <button onclick="post('/api/switch/set', {})">Off</button>
</fieldset>

<fieldset><legend>FIP</legend>
  <input id="pattern" value="test">
  <button onclick="post('/api/fip/pattern', {pattern: val('pattern')})">Show</button>
</fieldset>

<pre id="out"></pre>
<script>
  const val = (id) => document.getElementById(id).value;
  const values = (ids) => Object.fromEntries(ids.map((id) => [id, val(id)]));
  const print = (body) => { document.getElementById('out').textContent = JSON.stringify(body, null, 2); };
  async function post(url, body) {
    const res = await fetch(url, {method: 'POST', headers: {'Content-Type': 'application/json'}, body: JSON.stringify(body)});
    print(await res.json());
  }
  async function show(url) { print(await (await fetch(url)).json()); }
</script>
</body>
</html>
"#;
