use axum::response::Html;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Google Ads Backend API</title>
    <style>
        body { font-family: system-ui, -apple-system, sans-serif; max-width: 800px; margin: 50px auto; padding: 20px; }
        section { padding: 20px; border-radius: 8px; margin-top: 20px; }
        pre { background: #fff; padding: 10px; border-radius: 4px; }
        .endpoints { background: #f5f5f5; }
        .rules { background: #e3f2fd; }
        .config { background: #fff3e0; }
        footer { margin-top: 40px; text-align: center; color: #666; }
    </style>
</head>
<body>
    <h1>🎯 Google Ads Backend API</h1>
    <p>Creates responsive search ads in Google Ads. Every ad is created paused.</p>

    <section class="endpoints">
        <h2>📡 Endpoints</h2>

        <h3>1. Health check</h3>
        <pre>GET /api/health</pre>

        <h3>2. Create ad</h3>
        <pre>POST /api/create-ad
Content-Type: application/json

{
  "customerId": "1234567890",
  "adGroupId": "9876543210",
  "headlines": ["Headline 1", "Headline 2", "... up to 15"],
  "descriptions": ["Description 1", "Description 2", "... up to 4"],
  "finalUrl": "https://example.com"
}</pre>
    </section>

    <section class="rules">
        <h2>📋 Requirements</h2>
        <ul>
            <li>Headlines: 3-15 entries, at most 30 characters each</li>
            <li>Descriptions: 2-4 entries, at most 90 characters each</li>
            <li>A non-empty final URL</li>
        </ul>
    </section>

    <section class="config">
        <h2>⚙️ Configuration</h2>
        <p>The server reads these environment variables:</p>
        <ul>
            <li><code>GOOGLE_ADS_DEVELOPER_TOKEN</code></li>
            <li><code>GOOGLE_ADS_CLIENT_ID</code></li>
            <li><code>GOOGLE_ADS_CLIENT_SECRET</code></li>
            <li><code>GOOGLE_ADS_REFRESH_TOKEN</code></li>
            <li><code>GOOGLE_ADS_LOGIN_CUSTOMER_ID</code> (optional, manager account)</li>
        </ul>
    </section>

    <footer>
        <p>Powered by Rust + Google Ads API</p>
    </footer>
</body>
</html>
"#;

/// GET /
///
/// Static endpoint documentation.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}
