//! 页面内脚本目录
//!
//! crate 在页面里执行的每一段 JS 都是 `Script` 的一个变体。
//! 真实页面把变体渲染成 JS 源码执行；测试替身直接按变体匹配返回值。
//! 所有脚本都返回 JSON 可序列化的值（不会返回 `undefined`）。

use serde_json::Value as JsonValue;

use crate::infrastructure::page_controller::Target;
use crate::selectors::TooltipSelectors;

/// 内容就绪探针：区域内标题非空，且（若给出）至少一个附加选择器存在
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentProbe {
    pub region: String,
    pub title: String,
    pub any_of: Vec<String>,
}

/// 页面内脚本
#[derive(Debug, Clone, PartialEq)]
pub enum Script {
    /// 匹配选择器的元素数量 -> number
    Count { selector: String },
    /// 第 n 个元素的属性 -> string | null
    Attribute { target: Target, name: String },
    /// 可见性信号 -> null | RegionSignals
    RegionSignals { target: Target },
    /// 视口坐标下的包围盒 -> null | {x, y, width, height}
    BoundingBox { target: Target },
    /// 滚动到视口中央 -> bool
    ScrollIntoView { target: Target },
    /// 脚本点击 -> bool
    ForceClick { target: Target },
    /// 内容就绪探针 -> bool
    ContentReady(ContentProbe),
    /// 元素文本（去空白后）是否等于期望值 -> bool
    TextEquals { selector: String, expected: String },
    /// 设置滑块取值并派发 input/change 事件 -> bool
    SetRangeValue { selector: String, value: u32 },
    /// 强制显示区域 -> bool
    ForceDisplay { selector: String },
    /// tooltip 快照 -> null | {image, name, cost, stats, uniques, kindClass}
    TooltipSnapshot(TooltipSelectors),
    /// 统计区块 `{标签: 文本}` -> object
    StatBlocks { blocks: String },
    /// 英雄资料（技能、出装、符文、情景装、加点）-> object
    ChampionProfile,
    /// 关闭横幅 -> 点击次数
    DismissBanners {
        texts: Vec<String>,
        selectors: Vec<String>,
    },
    /// 逐屏滚动到底部以触发懒加载 -> bool
    AutoScroll,
    /// 所有 `a[href]` 的原始 href -> string[]
    CollectLinks,
}

impl Script {
    /// 渲染为可执行的 JS 表达式
    pub fn source(&self) -> String {
        match self {
            Script::Count { selector } => {
                format!("document.querySelectorAll({}).length", js_str(selector))
            }
            Script::Attribute { target, name } => format!(
                r#"(() => {{
                    const el = {};
                    return el ? el.getAttribute({}) : null;
                }})()"#,
                element_js(target),
                js_str(name)
            ),
            Script::RegionSignals { target } => format!(
                r#"(() => {{
                    const el = {};
                    if (!el) return null;
                    const cs = window.getComputedStyle(el);
                    const rect = el.getBoundingClientRect();
                    return {{
                        display: cs.display,
                        visibility: cs.visibility,
                        position: cs.position,
                        width: rect.width,
                        height: Math.max(rect.height, el.clientHeight),
                        hasOffsetParent: el.offsetParent !== null,
                        inlineHidden: el.style.display === 'none',
                    }};
                }})()"#,
                element_js(target)
            ),
            Script::BoundingBox { target } => format!(
                r#"(() => {{
                    const el = {};
                    if (!el) return null;
                    const r = el.getBoundingClientRect();
                    if (r.width === 0 && r.height === 0) return null;
                    return {{ x: r.left, y: r.top, width: r.width, height: r.height }};
                }})()"#,
                element_js(target)
            ),
            Script::ScrollIntoView { target } => format!(
                r#"(() => {{
                    const el = {};
                    if (!el) return false;
                    el.scrollIntoView({{ block: 'center', inline: 'center' }});
                    return true;
                }})()"#,
                element_js(target)
            ),
            Script::ForceClick { target } => format!(
                r#"(() => {{
                    const el = {};
                    if (!el) return false;
                    el.click();
                    return true;
                }})()"#,
                element_js(target)
            ),
            Script::ContentReady(probe) => format!(
                r#"(() => {{
                    const region = document.querySelector({});
                    if (!region || region.style.display === 'none') return false;
                    const title = region.querySelector({});
                    if (!title || !(title.textContent || '').trim()) return false;
                    const anyOf = {};
                    if (anyOf.length === 0) return true;
                    return anyOf.some((sel) => region.querySelector(sel) !== null);
                }})()"#,
                js_str(&probe.region),
                js_str(&probe.title),
                js_list(&probe.any_of)
            ),
            Script::TextEquals { selector, expected } => format!(
                r#"(() => {{
                    const el = document.querySelector({});
                    return !!el && (el.textContent || '').trim() === {};
                }})()"#,
                js_str(selector),
                js_str(expected)
            ),
            Script::SetRangeValue { selector, value } => format!(
                r#"(() => {{
                    const input = document.querySelector({});
                    if (!input) return false;
                    input.value = String({});
                    input.dispatchEvent(new Event('input', {{ bubbles: true }}));
                    input.dispatchEvent(new Event('change', {{ bubbles: true }}));
                    return true;
                }})()"#,
                js_str(selector),
                value
            ),
            Script::ForceDisplay { selector } => format!(
                r#"(() => {{
                    const el = document.querySelector({});
                    if (!el) return false;
                    el.style.setProperty('display', 'block', 'important');
                    el.style.setProperty('visibility', 'visible', 'important');
                    return true;
                }})()"#,
                js_str(selector)
            ),
            Script::TooltipSnapshot(sel) => format!(
                r#"(() => {{
                    const t = document.querySelector({container});
                    if (!t) return null;
                    const text = (el) => el ? (el.textContent || '').trim() : null;
                    const img = t.querySelector({image});
                    const uniques = t.querySelector({uniques});
                    const kindNode = t.querySelector({kind});
                    return {{
                        image: img ? img.getAttribute('src') : null,
                        name: text(t.querySelector({title})),
                        cost: text(t.querySelector({cost})),
                        stats: Array.from(t.querySelectorAll({stats}))
                            .map((s) => (s.textContent || '').trim())
                            .filter(Boolean),
                        uniques: uniques ? (uniques.innerHTML || '').trim() : null,
                        kindClass: kindNode ? kindNode.getAttribute('class') : null,
                    }};
                }})()"#,
                container = js_str(&sel.container),
                image = js_str(&sel.image),
                uniques = js_str(&sel.uniques),
                kind = js_str(&sel.kind_node),
                title = js_str(&sel.title),
                cost = js_str(&sel.cost),
                stats = js_str(&sel.stats),
            ),
            Script::StatBlocks { blocks } => format!(
                r#"(() => {{
                    const out = {{}};
                    document.querySelectorAll({}).forEach((b) => {{
                        const nameEl = b.querySelector('.name');
                        const valueEl = b.querySelector('.value');
                        if (!nameEl || !valueEl) return;
                        const label = nameEl.textContent.replace(/\s+/g, ' ').trim();
                        const value = valueEl.textContent.replace(/\s+/g, ' ').trim();
                        if (label) out[label] = value;
                    }});
                    return out;
                }})()"#,
                js_str(blocks)
            ),
            Script::ChampionProfile => CHAMPION_PROFILE_JS.to_string(),
            Script::DismissBanners { texts, selectors } => format!(
                r#"(() => {{
                    const visible = (el) => {{
                        const cs = getComputedStyle(el);
                        const r = el.getBoundingClientRect();
                        return cs.display !== 'none' && cs.visibility !== 'hidden' && r.width > 0 && r.height > 0;
                    }};
                    let clicked = 0;
                    for (const text of {}) {{
                        const btn = Array.from(document.querySelectorAll('button'))
                            .find((b) => (b.textContent || '').includes(text) && visible(b));
                        if (btn) {{ btn.click(); clicked += 1; }}
                    }}
                    for (const sel of {}) {{
                        const el = document.querySelector(sel);
                        if (el && visible(el)) {{ el.click(); clicked += 1; }}
                    }}
                    return clicked;
                }})()"#,
                js_list(texts),
                js_list(selectors)
            ),
            Script::AutoScroll => AUTO_SCROLL_JS.to_string(),
            Script::CollectLinks => {
                "Array.from(document.querySelectorAll('a[href]')).map((a) => a.getAttribute('href')).filter(Boolean)"
                    .to_string()
            }
        }
    }
}

/// JS 字符串字面量
fn js_str(value: &str) -> String {
    JsonValue::String(value.to_string()).to_string()
}

/// JS 字符串数组字面量
fn js_list(values: &[String]) -> String {
    JsonValue::from(values.to_vec()).to_string()
}

fn element_js(target: &Target) -> String {
    format!(
        "document.querySelectorAll({})[{}]",
        js_str(&target.selector),
        target.nth
    )
}

const AUTO_SCROLL_JS: &str = r#"(async () => {
    await new Promise((resolve) => {
        let y = 0;
        let steps = 0;
        const step = () => {
            y += Math.floor(window.innerHeight * 0.8);
            steps += 1;
            window.scrollTo(0, y);
            if (y < document.body.scrollHeight && steps < 200) {
                setTimeout(step, 120);
            } else {
                setTimeout(resolve, 200);
            }
        };
        step();
    });
    return true;
})()"#;

const CHAMPION_PROFILE_JS: &str = r#"(() => {
    const squash = (s) => (s || '').replace(/\s+/g, ' ').trim();
    const iconItems = (root, selector, extra) => Array.from(root.querySelectorAll(selector)).map((item) => {
        const img = item.querySelector('img');
        const name = item.querySelector('.name');
        if (!img || !name) return null;
        return Object.assign({ name: name.textContent.trim(), image: img.getAttribute('src') }, extra ? extra(item, img) : {});
    }).filter(Boolean);
    const guideBlocks = (selector, build) => Array.from(document.querySelectorAll(selector)).map((block) => Object.assign({
        guideId: block.getAttribute('data-guide-id'),
        isActive: !block.classList.contains('inactive'),
    }, build(block)));

    const abilities = Array.from(document.querySelectorAll('.statsBlock.abilities .statsBlock__block')).map((block) => {
        const nameWrap = block.querySelector('.upper .info .name');
        let key = null;
        let name = null;
        if (nameWrap) {
            const span = nameWrap.querySelector('span');
            if (span) key = span.textContent.trim();
            const clone = nameWrap.cloneNode(true);
            const spanClone = clone.querySelector('span');
            if (spanClone) spanClone.remove();
            name = squash(clone.textContent);
        }
        const lower = block.querySelector('.lower');
        const icon = block.querySelector('.upper img');
        return {
            key,
            name,
            cooldown: Array.from(block.querySelectorAll('.upper .info .cooldown span')).map((s) => s.textContent.trim()),
            cost: Array.from(block.querySelectorAll('.upper .info .cost span')).map((s) => s.textContent.trim()),
            icon: icon ? icon.getAttribute('src') : null,
            descriptionHtml: lower ? lower.innerHTML.trim() : null,
            descriptionText: lower ? squash(lower.textContent) : null,
        };
    });

    const enchant = (item) => ({ isEnchant: item.classList.contains('enchant') || item.querySelector('.enchant') !== null });
    const builds = guideBlocks('.wf-champion__data__items[data-guide-id]', (block) => ({
        starting: iconItems(block, '.section.starting .ico-holder', enchant),
        core: iconItems(block, '.section.core .ico-holder', enchant),
        boots: iconItems(block, '.section.boots .ico-holder', enchant),
        final: iconItems(block, '.section.final .ico-holder', enchant),
    }));

    const runesAndSpells = guideBlocks('.wf-champion__data__spells[data-guide-id]', (block) => ({
        summonerSpells: iconItems(block, '.section.spells .ico-holder'),
        runes: iconItems(block, '.section.runes .ico-holder', (item, img) => ({ isKeystone: img.classList.contains('keystone') })),
    }));

    const situationalItems = guideBlocks('.wf-champion__data__situational[data-guide-id]', (block) => ({
        situations: Array.from(block.querySelectorAll('.section.situation')).map((section) => {
            const label = section.querySelector('.situation[name="situation"]');
            if (!label) return null;
            const items = iconItems(section, '.ico-holder');
            return items.length ? { situation: label.textContent.trim(), items } : null;
        }).filter(Boolean),
    }));

    const skillOrders = guideBlocks('.wf-champion__data__skills[data-guide-id]', (block) => ({
        abilities: Array.from(block.querySelectorAll('.skills-mod__abilities__row:not(.skills-mod__abilities__row--passive)')).map((row) => {
            const span = row.querySelector('span');
            const name = span ? span.textContent.trim() : '';
            if (!name) return null;
            const levels = Array.from(row.querySelectorAll('li.lit'))
                .map((li) => parseInt(li.getAttribute('level') || '', 10))
                .filter((n) => !Number.isNaN(n) && n > 0);
            return { name, levels };
        }).filter(Boolean),
        quickOrder: Array.from(block.querySelectorAll('.skills-mod__quick__order .ico-holder img')).map((img) => ({
            image: img.getAttribute('src'),
            alt: img.getAttribute('alt'),
        })),
    }));

    return { abilities, builds, runesAndSpells, situationalItems, skillOrders };
})()"#;
