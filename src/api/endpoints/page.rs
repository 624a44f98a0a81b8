//! `GET /` — the report form (self-contained, no external resources).

use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html(FORM_PAGE_HTML)
}

const FORM_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>ColpoVision — Diagnóstico IA + Informe Profesional</title>
  <style>
    * { box-sizing: border-box; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917; margin: 0; padding: 24px;
    }
    main { max-width: 960px; margin: 0 auto; }
    h1 { font-size: 26px; margin: 0 0 16px; }
    h2 { font-size: 19px; margin: 28px 0 12px; }
    label { display: block; font-weight: 500; margin: 14px 0 6px; }
    input[type=text], input[type=date], textarea {
      width: 100%; padding: 10px; font-size: 15px;
      border: 1px solid #d6d3d1; border-radius: 8px; font-family: inherit;
    }
    textarea { min-height: 84px; resize: vertical; }
    #preview { max-width: 100%; border-radius: 8px; margin-top: 12px; display: none; }
    .panel { padding: 12px 16px; border-radius: 8px; margin: 8px 0; }
    .panel.result { background: #dcfce7; }
    .panel.confidence { background: #dbeafe; }
    .panel.priority { background: #fef3c7; }
    .btn {
      padding: 14px 20px; border: none; border-radius: 8px; font-size: 16px;
      background: #4a7c59; color: white; cursor: pointer; margin-top: 20px;
    }
    .btn:disabled { opacity: 0.5; cursor: not-allowed; }
    .status { margin-top: 16px; }
    .status.error { color: #dc2626; }
    .status.success { color: #16a34a; }
    #report-section { display: none; }
  </style>
</head>
<body>
<main>
  <h1>ColpoVision – Diagnóstico IA + Informe Profesional</h1>

  <label for="image">Subí una imagen colposcópica (JPG o PNG)</label>
  <input type="file" id="image" accept=".jpg,.jpeg,.png,image/jpeg,image/png">
  <img id="preview" alt="Imagen cargada">
  <div class="status" id="analyze-status"></div>

  <section id="report-section">
    <h2>Resultado automático por IA</h2>
    <div class="panel result"><strong>Diagnóstico IA:</strong> <span id="dx-label"></span></div>
    <div class="panel confidence"><strong>Confianza:</strong> <span id="dx-confidence"></span></div>
    <div class="panel priority"><strong>Nivel de prioridad:</strong> <span id="dx-priority"></span></div>

    <h2>Informe clínico</h2>
    <form id="report-form">
      <label for="patient_name">Nombre del paciente:</label>
      <input type="text" id="patient_name" name="patient_name">
      <label for="age">Edad:</label>
      <input type="text" id="age" name="age">
      <label for="study_date">Fecha del estudio:</label>
      <input type="date" id="study_date" name="study_date">
      <label for="reason_for_visit">Motivo de consulta:</label>
      <textarea id="reason_for_visit" name="reason_for_visit"></textarea>
      <label for="technique">Técnica y métodos utilizados:</label>
      <textarea id="technique" name="technique"></textarea>
      <label for="findings">Hallazgos colposcópicos:</label>
      <textarea id="findings" name="findings"></textarea>
      <label for="impression">Impresión diagnóstica:</label>
      <textarea id="impression" name="impression"></textarea>
      <label for="recommendations">Recomendaciones finales (editable):</label>
      <textarea id="recommendations" name="recommendations"></textarea>
      <button class="btn" type="submit" id="export-btn">Exportar PDF</button>
    </form>
    <div class="status" id="report-status"></div>
  </section>
</main>

<script>
  var imageInput = document.getElementById('image');
  var preview = document.getElementById('preview');
  var reportSection = document.getElementById('report-section');
  var form = document.getElementById('report-form');
  var exportBtn = document.getElementById('export-btn');
  var currentFile = null;

  document.getElementById('study_date').valueAsDate = new Date();

  function showStatus(id, text, type) {
    var el = document.getElementById(id);
    el.textContent = text;
    el.className = 'status ' + (type || '');
  }

  function errorMessage(xhr, fallback) {
    try {
      var resp = JSON.parse(xhr.responseText);
      return (resp.error && resp.error.message) || fallback;
    } catch (_) {
      return fallback;
    }
  }

  imageInput.addEventListener('change', function() {
    var file = imageInput.files[0];
    if (!file) return;
    currentFile = file;
    preview.src = URL.createObjectURL(file);
    preview.style.display = 'block';
    showStatus('analyze-status', 'Analizando...', '');

    var data = new FormData();
    data.append('image', file);
    var xhr = new XMLHttpRequest();
    xhr.open('POST', '/api/analyze');
    xhr.onload = function() {
      if (xhr.status !== 200) {
        reportSection.style.display = 'none';
        showStatus('analyze-status', errorMessage(xhr, 'No se pudo analizar la imagen.'), 'error');
        return;
      }
      var dx = JSON.parse(xhr.responseText);
      document.getElementById('dx-label').textContent = dx.label;
      document.getElementById('dx-confidence').textContent = dx.confidence;
      document.getElementById('dx-priority').textContent = dx.priority;
      document.getElementById('recommendations').value = dx.recommendation;
      reportSection.style.display = 'block';
      showStatus('analyze-status', '', '');
    };
    xhr.onerror = function() {
      showStatus('analyze-status', 'Sin conexión con el servidor local.', 'error');
    };
    xhr.send(data);
  });

  form.addEventListener('submit', function(e) {
    e.preventDefault();
    var data = new FormData(form);
    if (currentFile) data.append('image', currentFile);

    exportBtn.disabled = true;
    showStatus('report-status', 'Generando informe...', '');

    var xhr = new XMLHttpRequest();
    xhr.open('POST', '/api/report');
    xhr.responseType = 'blob';
    xhr.onload = function() {
      exportBtn.disabled = false;
      if (xhr.status !== 200) {
        var reader = new FileReader();
        reader.onload = function() {
          showStatus('report-status',
            errorMessage({ responseText: reader.result }, 'No se pudo generar el informe PDF.'),
            'error');
        };
        reader.readAsText(xhr.response);
        return;
      }
      var link = document.createElement('a');
      link.href = URL.createObjectURL(xhr.response);
      link.download = 'informe_colposcopico.pdf';
      link.textContent = 'Descargar informe PDF';
      var status = document.getElementById('report-status');
      status.textContent = '';
      status.className = 'status success';
      status.appendChild(link);
    };
    xhr.onerror = function() {
      exportBtn.disabled = false;
      showStatus('report-status', 'Sin conexión con el servidor local.', 'error');
    };
    xhr.send(data);
  });
</script>
</body>
</html>"#;
