//! Theme to stylesheet

use crate::config::ResolvedConfig;

/// `{token}` placeholders are filled from the resolved theme
const TEMPLATE: &str = r"
#{p}-toggle{position:fixed;bottom:24px;{side}:24px;width:60px;height:60px;border-radius:50%;background:{gradient};border:none;cursor:pointer;box-shadow:0 4px 24px {glow};z-index:{z_toggle};display:flex;align-items:center;justify-content:center;transition:transform 0.3s,box-shadow 0.3s}
#{p}-toggle:hover{transform:scale(1.1);box-shadow:0 6px 32px {glow_hover}}
#{p}-toggle svg{width:28px;height:28px;fill:white}
#{p}-window{position:fixed;bottom:96px;{side}:24px;width:380px;max-width:calc(100vw - 48px);height:560px;max-height:calc(100vh - 120px);border-radius:20px;overflow:hidden;z-index:{z_window};display:none;flex-direction:column;background:rgba(255,255,255,0.85);backdrop-filter:blur(20px);-webkit-backdrop-filter:blur(20px);border:1px solid rgba(255,255,255,0.3);box-shadow:0 8px 32px rgba(0,0,0,0.12),0 2px 8px rgba(0,0,0,0.06);font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif}
#{p}-window.open{display:flex;animation:{p}-slideUp 0.3s ease-out}
@keyframes {p}-slideUp{from{opacity:0;transform:translateY(20px)}to{opacity:1;transform:translateY(0)}}
#{p}-header{background:{gradient};color:white;padding:16px 20px;display:flex;align-items:center;justify-content:space-between;flex-shrink:0}
#{p}-header-info{display:flex;align-items:center;gap:12px}
#{p}-header-avatar{width:40px;height:40px;border-radius:50%;background:rgba(255,255,255,0.2);display:flex;align-items:center;justify-content:center;font-size:20px}
#{p}-header h3{margin:0;font-size:16px;font-weight:600}
#{p}-header p{margin:2px 0 0;font-size:12px;opacity:0.9}
#{p}-close{background:none;border:none;color:white;font-size:24px;cursor:pointer;padding:4px 8px;border-radius:8px;line-height:1}
#{p}-close:hover{background:rgba(255,255,255,0.15)}
#{p}-messages{flex:1;overflow-y:auto;padding:16px;display:flex;flex-direction:column;gap:12px}
.{p}-msg{max-width:85%;padding:10px 14px;border-radius:16px;font-size:14px;line-height:1.5;word-wrap:break-word}
.{p}-msg.bot{align-self:flex-start;background:rgba(255,255,255,0.9);border:1px solid rgba(0,0,0,0.06);color:#1f2937;border-bottom-left-radius:4px}
.{p}-msg.user{align-self:flex-end;background:{gradient};color:white;border-bottom-right-radius:4px}
.{p}-quick-replies{display:flex;flex-wrap:wrap;gap:8px;padding:0 16px 8px}
.{p}-quick-btn{background:{tint};border:1px solid {tint_border};color:{primary};padding:6px 14px;border-radius:20px;font-size:13px;cursor:pointer;transition:all 0.2s;white-space:nowrap}
.{p}-quick-btn:hover{background:{primary};color:white}
.{p}-typing{align-self:flex-start;padding:12px 16px;background:rgba(255,255,255,0.9);border:1px solid rgba(0,0,0,0.06);border-radius:16px;border-bottom-left-radius:4px;display:flex;gap:4px}
.{p}-typing span{width:8px;height:8px;border-radius:50%;background:#9ca3af;animation:{p}-bounce 1.4s infinite}
.{p}-typing span:nth-child(2){animation-delay:0.2s}
.{p}-typing span:nth-child(3){animation-delay:0.4s}
@keyframes {p}-bounce{0%,60%,100%{transform:translateY(0)}30%{transform:translateY(-8px)}}
#{p}-input-area{display:flex;padding:12px 16px;gap:8px;border-top:1px solid rgba(0,0,0,0.06);background:rgba(255,255,255,0.7);flex-shrink:0}
#{p}-input{flex:1;border:1px solid rgba(0,0,0,0.1);border-radius:24px;padding:10px 16px;font-size:14px;outline:none;background:white;transition:border-color 0.2s}
#{p}-input:focus{border-color:{primary}}
#{p}-send{width:42px;height:42px;border-radius:50%;background:{gradient};border:none;cursor:pointer;display:flex;align-items:center;justify-content:center;flex-shrink:0;transition:transform 0.2s}
#{p}-send:hover{transform:scale(1.05)}
#{p}-send:disabled{opacity:0.5;cursor:not-allowed;transform:none}
#{p}-send svg{width:18px;height:18px;fill:white}
.{p}-lead-form{padding:16px;background:{form_tint};border:1px solid {form_border};border-radius:12px;margin:0 16px 8px}
.{p}-lead-form h4{margin:0 0 12px;font-size:14px;color:#1f2937}
.{p}-lead-form input,.{p}-lead-form select{width:100%;padding:8px 12px;border:1px solid rgba(0,0,0,0.1);border-radius:8px;font-size:13px;margin-bottom:8px;box-sizing:border-box;outline:none}
.{p}-lead-form input:focus,.{p}-lead-form select:focus{border-color:{primary}}
.{p}-lead-error{color:#dc2626;font-size:12px;margin:0 0 8px}
.{p}-lead-submit{width:100%;padding:10px;background:{gradient};color:white;border:none;border-radius:8px;font-size:14px;font-weight:600;cursor:pointer;margin-top:4px}
.{p}-lead-submit:hover{opacity:0.9}
#{p}-powered{text-align:center;padding:6px;font-size:11px;color:#9ca3af;flex-shrink:0}
";

/// Stylesheet for one widget instance. Every selector is scoped by the
/// config prefix so two brands can share a page.
#[must_use]
pub fn stylesheet(config: &ResolvedConfig) -> String {
    let theme = &config.theme;
    let primary = theme.primary;
    let tokens = [
        ("{p}", config.prefix.clone()),
        ("{side}", theme.position.as_str().to_string()),
        ("{gradient}", theme.gradient.clone()),
        ("{primary}", primary.hex()),
        ("{glow}", primary.rgba(40)),
        ("{glow_hover}", primary.rgba(50)),
        ("{tint}", primary.rgba(8)),
        ("{tint_border}", primary.rgba(20)),
        ("{form_tint}", primary.rgba(4)),
        ("{form_border}", primary.rgba(15)),
        ("{z_toggle}", theme.z_index.to_string()),
        ("{z_window}", theme.z_index.saturating_sub(1).to_string()),
    ];

    tokens
        .iter()
        .fold(TEMPLATE.trim_start().to_string(), |css, (token, value)| {
            css.replace(token, value)
        })
}
