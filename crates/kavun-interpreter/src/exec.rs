use crate::builtins;
use crate::eval::evaluate;
use crate::runtime::{FunctionDef, Runtime};
use crate::signal::Signal;
use kavun_errors::Result;
use kavun_parser::block::collect_block;
use kavun_parser::{compile_expression, parse_input_value, split_top_level_args};
use kavun_value::Value;
use once_cell::sync::Lazy;
use regex::Regex;

macro_rules! re {
    ($name:ident, $pattern:expr) => {
        static $name: Lazy<Regex> = Lazy::new(|| Regex::new($pattern).unwrap());
    };
}

re!(WAIT, r"^(\d+(?:\.\d+)?)\s+saniye\s+bekle$");
re!(LIST_INDEX_ASSIGN, r"^(\w+)\[(\d+)\]\s+(?:eşittir|=)\s+(.+)$");
re!(LIST_APPEND, r"^(\w+)\.ekle\((.+)\)$");
re!(LIST_REMOVE, r"^(\w+)\.sil\((\d+)\)$");
re!(TEXT_LENGTH, r"^(\w+)\.uzunluk\(\)$");
re!(TEXT_UPPER, r"^(\w+)\.büyük_harf\(\)$");
re!(TEXT_LOWER, r"^(\w+)\.küçük_harf\(\)$");
re!(FILE_READ, r#"^dosya_oku\("([^"]+)"\)$"#);
re!(FILE_WRITE, r#"^dosya_yaz\("([^"]+)",\s*(.+)\)$"#);
re!(RANDOM_RANGE_BARE, r"^(\d+)\s+ile\s+(\d+)\s+arasi_rastgele\(\)$");
re!(RANDOM_RANGE_ASSIGN, r"^(\w+)\s+(?:eşittir|=)\s+(\d+)\s+ile\s+(\d+)\s+arasi_rastgele\(\)$");
re!(COLOR_PRINT, r"^(.+)\s+(kırmızı_yaz|yesil_yaz|sarı_yaz|mavi_yaz|mor_yaz|turkuaz_yaz)$");
re!(ANIMATED_PRINT, r"^(.+)\s+animasyonlu_yaz$");
re!(TRIANGLE, r"^üçgen_çiz\((\d+)\)$");
re!(SQUARE, r"^kare_çiz\((\d+)\)$");
re!(BAR_CHART, r"^grafik_çiz\(\[(.*)\]\)$");
re!(DICT_LITERAL_ASSIGN, r"^(\w+)\s+(?:eşittir|=)\s+\{(.*)\}$");
re!(DICT_INDEX_ASSIGN, r#"^(\w+)\["([^"]+)"\]\s+(?:eşittir|=)\s+(.+)$"#);
re!(RETURN_VALUE, r"^(.+)\s+dön$");
re!(ASSIGNMENT, r"^(.+?)\s*(?:eşittir|=)\s*(.+)$");
re!(PRINT, r"^(.+)\s+yaz$");
re!(IF_CLAUSE_HEADER, r"^(yoksa\s+)?(.+?)\s+ise:$");
re!(WHILE_HEADER, r"^(.+?)\s+iken:$");
re!(FOR_HEADER, r"^(\w+)\s+için\s+([+-]?\d+)\s+den\s+([+-]?\d+)\s+kadar:$");
re!(FUNCTION_DEF, r"^(.+?)\s+ile\s+(.+?)\s+işi:$");
re!(USER_CALL_STMT, r"^(.+?)\s+ile\s+(.+?)\s+işi$");
re!(USER_CALL_PREFIX_STMT, r"^iş\s+(\w+)\s*\((.*)\)\s*$");

/// Executes a block of already-structured source lines (spec.md §4.4),
/// dispatching each line against the statement forms in the priority order
/// the reference implementation checks them in. Returns the [`Signal`] that
/// should propagate to the caller: `Normal` if the block ran to completion,
/// or `Break`/`Continue`/`Return` if control flow needs to unwind further.
pub fn run_block(rt: &mut Runtime, lines: &[String]) -> Result<Signal> {
    let mut idx = 0;
    while idx < lines.len() {
        rt.call_trace.set_current_line(idx + 1);
        let line = lines[idx].trim().to_string();

        if line.is_empty() || line.starts_with("//") {
            idx += 1;
            continue;
        }

        if line == "temizle" {
            clear_screen();
            idx += 1;
            continue;
        }
        if line == "yeni_satır" {
            rt.println("");
            idx += 1;
            continue;
        }
        if let Some(caps) = WAIT.captures(&line) {
            let seconds: f64 = caps[1].parse().unwrap_or(0.0);
            std::thread::sleep(std::time::Duration::from_secs_f64(seconds.max(0.0)));
            idx += 1;
            continue;
        }

        if let Some(caps) = LIST_INDEX_ASSIGN.captures(&line) {
            assign_list_index(rt, &caps[1], &caps[2], &caps[3], idx)?;
            idx += 1;
            continue;
        }
        if let Some(caps) = LIST_APPEND.captures(&line) {
            list_method(rt, &caps[1], &caps[2], idx, ListMethod::Append)?;
            idx += 1;
            continue;
        }
        if let Some(caps) = LIST_REMOVE.captures(&line) {
            list_method(rt, &caps[1], &caps[2], idx, ListMethod::Remove)?;
            idx += 1;
            continue;
        }
        if let Some(caps) = TEXT_LENGTH.captures(&line) {
            let text = rt.frames.get(&caps[1]).cloned().unwrap_or(Value::String(String::new()));
            rt.frames.set(format!("{}_uzunluk", &caps[1]), Value::Integer(text.to_string().chars().count() as i64));
            idx += 1;
            continue;
        }
        if let Some(caps) = TEXT_UPPER.captures(&line) {
            let text = rt.frames.get(&caps[1]).cloned().unwrap_or(Value::String(String::new()));
            rt.frames.set(format!("{}_büyük", &caps[1]), Value::String(text.to_string().to_uppercase()));
            idx += 1;
            continue;
        }
        if let Some(caps) = TEXT_LOWER.captures(&line) {
            let text = rt.frames.get(&caps[1]).cloned().unwrap_or(Value::String(String::new()));
            rt.frames.set(format!("{}_küçük", &caps[1]), Value::String(text.to_string().to_lowercase()));
            idx += 1;
            continue;
        }
        if let Some(caps) = FILE_READ.captures(&line) {
            match builtins::call(rt, "dosya_oku", &[Value::String(caps[1].to_string())]) {
                Ok(content) => rt.frames.set("dosya_içerik", content),
                Err(e) => report_line_error(rt, idx, &e.to_string()),
            }
            idx += 1;
            continue;
        }
        if let Some(caps) = FILE_WRITE.captures(&line) {
            let content = eval_line(rt, &caps[2])?;
            if let Err(e) = builtins::call(rt, "dosya_yaz", &[Value::String(caps[1].to_string()), content]) {
                report_line_error(rt, idx, &e.to_string());
            }
            idx += 1;
            continue;
        }
        if line == "klasor_listesi()" {
            match builtins::call(rt, "klasor_listesi", &[]) {
                Ok(list) => {
                    rt.println("Klasördeki dosyalar:");
                    if let Some(items) = list.as_list() {
                        for item in items.borrow().iter() {
                            rt.println(&format!("  - {item}"));
                        }
                    }
                    rt.frames.set("dosya_listesi", list);
                }
                Err(e) => report_line_error(rt, idx, &e.to_string()),
            }
            idx += 1;
            continue;
        }
        if line == "şimdi()" {
            let value = builtins::call(rt, "şimdi", &[])?;
            rt.frames.set("su_an", value);
            idx += 1;
            continue;
        }
        if line == "tarih()" {
            let value = builtins::call(rt, "tarih", &[])?;
            rt.frames.set("bugun", value);
            idx += 1;
            continue;
        }
        if line == "saat()" {
            let value = builtins::call(rt, "saat", &[])?;
            rt.frames.set("su_saat", value);
            idx += 1;
            continue;
        }
        if line == "rastgele_sayi()" {
            let value = builtins::call(rt, "rastgele", &[])?;
            rt.frames.set("rastgele", value);
            idx += 1;
            continue;
        }
        if let Some(caps) = RANDOM_RANGE_BARE.captures(&line) {
            let lo: i64 = caps[1].parse().unwrap_or(1);
            let hi: i64 = caps[2].parse().unwrap_or(100);
            let value = builtins::call(rt, "rastgele", &[Value::Integer(lo), Value::Integer(hi)])?;
            rt.frames.set("rastgele", value);
            idx += 1;
            continue;
        }
        if let Some(caps) = RANDOM_RANGE_ASSIGN.captures(&line) {
            let lo: i64 = caps[2].parse().unwrap_or(1);
            let hi: i64 = caps[3].parse().unwrap_or(100);
            let value = builtins::call(rt, "rastgele", &[Value::Integer(lo), Value::Integer(hi)])?;
            rt.frames.set(caps[1].to_string(), value);
            idx += 1;
            continue;
        }
        if let Some(caps) = COLOR_PRINT.captures(&line) {
            match eval_line(rt, &caps[1]) {
                Ok(value) => {
                    let _ = builtins::call(rt, &caps[2], &[value]);
                }
                Err(e) => report_line_error(rt, idx, &format!("Renkli yazdırma hatası: {e}")),
            }
            idx += 1;
            continue;
        }
        if let Some(caps) = ANIMATED_PRINT.captures(&line) {
            match eval_line(rt, &caps[1]) {
                Ok(value) => {
                    let _ = builtins::call(rt, "animasyonlu_yaz", &[value]);
                }
                Err(e) => report_line_error(rt, idx, &format!("Animasyonlu yazdırma hatası: {e}")),
            }
            idx += 1;
            continue;
        }
        if line == "animasyon_durdur" {
            rt.animation.stop();
            idx += 1;
            continue;
        }
        if let Some(caps) = TRIANGLE.captures(&line) {
            let size = Value::Integer(caps[1].parse().unwrap_or(0));
            if let Err(e) = builtins::call(rt, "üçgen_çiz", &[size]) {
                report_line_error(rt, idx, &format!("Üçgen çizme hatası: {e}"));
            }
            idx += 1;
            continue;
        }
        if let Some(caps) = SQUARE.captures(&line) {
            let size = Value::Integer(caps[1].parse().unwrap_or(0));
            if let Err(e) = builtins::call(rt, "kare_çiz", &[size]) {
                report_line_error(rt, idx, &format!("Kare çizme hatası: {e}"));
            }
            idx += 1;
            continue;
        }
        if line == "kalp_çiz()" {
            if let Err(e) = builtins::call(rt, "kalp_çiz", &[]) {
                report_line_error(rt, idx, &format!("Kalp çizme hatası: {e}"));
            }
            idx += 1;
            continue;
        }
        if let Some(caps) = BAR_CHART.captures(&line) {
            match eval_elements(rt, &caps[1]) {
                Ok(values) => {
                    if let Err(e) = builtins::call(rt, "grafik_çiz", &[Value::new_list(values)]) {
                        report_line_error(rt, idx, &format!("Grafik çizme hatası: {e}"));
                    }
                }
                Err(e) => report_line_error(rt, idx, &format!("Grafik çizme hatası: {e}")),
            }
            idx += 1;
            continue;
        }

        if let Some(caps) = DICT_LITERAL_ASSIGN.captures(&line) {
            match parse_dict_literal(rt, &caps[2]) {
                Ok(dict) => rt.frames.set(caps[1].to_string(), dict),
                Err(e) => report_line_error(rt, idx, &format!("Sözlük oluşturma hatası: {e}")),
            }
            idx += 1;
            continue;
        }
        if let Some(caps) = DICT_INDEX_ASSIGN.captures(&line) {
            match eval_line(rt, &caps[3]) {
                Ok(value) => match rt.frames.get(&caps[1]).cloned() {
                    Some(dict_value) => match dict_value.as_dict() {
                        Some(dict) => {
                            dict.borrow_mut().insert(caps[2].to_string(), value);
                        }
                        None => report_line_error(rt, idx, &format!("{} bir sözlük değil", &caps[1])),
                    },
                    None => report_line_error(rt, idx, &format!("{} bir sözlük değil", &caps[1])),
                },
                Err(e) => report_line_error(rt, idx, &format!("Sözlük değiştirme hatası: {e}")),
            }
            idx += 1;
            continue;
        }

        if line == "kır" {
            return Ok(Signal::Break);
        }
        if line == "devam" {
            return Ok(Signal::Continue);
        }
        if line == "dön" {
            return Ok(Signal::Return(Value::Nil));
        }
        if let Some(caps) = RETURN_VALUE.captures(&line) {
            let value = eval_line(rt, &caps[1])?;
            return Ok(Signal::Return(value));
        }

        if let Some(caps) = ASSIGNMENT.captures(&line) {
            let name = caps[1].trim().to_string();
            let expr = caps[2].trim();
            if expr == "cevap()" {
                let mut input = String::new();
                std::io::stdin().read_line(&mut input).map_err(|e| kavun_errors::RuntimeError::io("Girdi okuma hatası", e))?;
                rt.frames.set(name, parse_input_value(&input));
            } else {
                let value = eval_line(rt, expr)?;
                rt.frames.set(name, value);
            }
            idx += 1;
            continue;
        }

        if let Some(caps) = PRINT.captures(&line) {
            match eval_line(rt, &caps[1]) {
                Ok(value) => rt.println(&value.to_string()),
                Err(e) => report_line_error(rt, idx, &format!("Yazdırma hatası: {e}")),
            }
            idx += 1;
            continue;
        }

        if line.ends_with(" ise:") {
            let (signal, next) = exec_if_chain(rt, lines, idx)?;
            if !signal.is_normal() {
                return Ok(signal);
            }
            idx = next;
            continue;
        }

        if let Some(caps) = WHILE_HEADER.captures(&line) {
            let cond = caps[1].trim().to_string();
            let (body, closing) = collect_block(lines, idx + 1);
            let signal = exec_while(rt, &cond, &body)?;
            if !signal.is_normal() {
                return Ok(signal);
            }
            idx = closing + 1;
            continue;
        }

        if let Some(caps) = FOR_HEADER.captures(&line) {
            let var = caps[1].to_string();
            let lo: i64 = caps[2].parse().unwrap_or(0);
            let hi: i64 = caps[3].parse().unwrap_or(0);
            let (body, closing) = collect_block(lines, idx + 1);
            let signal = exec_for(rt, &var, lo, hi, &body)?;
            if !signal.is_normal() {
                return Ok(signal);
            }
            idx = closing + 1;
            continue;
        }

        if let Some(caps) = FUNCTION_DEF.captures(&line) {
            let params = split_top_level_args(&caps[1]);
            let fname = caps[2].trim().to_string();
            let (body, closing) = collect_block(lines, idx + 1);
            rt.functions.insert(fname, FunctionDef { params, body });
            idx = closing + 1;
            continue;
        }

        if let Some(caps) = USER_CALL_STMT.captures(&line) {
            let source = format!("{} ile {} işi", &caps[1], &caps[2]);
            if let Err(e) = eval_line(rt, &source) {
                report_line_error(rt, idx, &e.to_string());
            }
            idx += 1;
            continue;
        }
        if USER_CALL_PREFIX_STMT.is_match(&line) {
            if let Err(e) = eval_line(rt, &line) {
                report_line_error(rt, idx, &e.to_string());
            }
            idx += 1;
            continue;
        }

        rt.println(&format!("[Hata satır {}] Tanınmayan komut: {line}", idx + 1));
        idx += 1;
    }
    Ok(Signal::Normal)
}

fn report_line_error(rt: &mut Runtime, idx: usize, message: &str) {
    rt.println(&format!("[Hata satır {}] {message}", idx + 1));
}

fn eval_line(rt: &mut Runtime, text: &str) -> Result<Value> {
    let expr = compile_expression(text, &mut rt.cache)?;
    evaluate(rt, &expr)
}

fn eval_elements(rt: &mut Runtime, csv: &str) -> Result<Vec<Value>> {
    split_top_level_args(csv).into_iter().map(|part| eval_line(rt, &part)).collect()
}

enum ListMethod {
    Append,
    Remove,
}

fn list_method(rt: &mut Runtime, name: &str, arg_text: &str, idx: usize, method: ListMethod) -> Result<()> {
    let Some(list_value) = rt.frames.get(name).cloned() else {
        report_line_error(rt, idx, &format!("{name} bir liste değil"));
        return Ok(());
    };
    let Some(list) = list_value.as_list() else {
        report_line_error(rt, idx, &format!("{name} bir liste değil"));
        return Ok(());
    };
    match method {
        ListMethod::Append => {
            let value = eval_line(rt, arg_text)?;
            list.borrow_mut().push(value);
        }
        ListMethod::Remove => {
            let index: i64 = arg_text.trim().parse().unwrap_or(-1);
            let mut list = list.borrow_mut();
            if index < 0 || index as usize >= list.len() {
                drop(list);
                report_line_error(rt, idx, &format!("Geçersiz indeks: {index}"));
            } else {
                list.remove(index as usize);
            }
        }
    }
    Ok(())
}

fn assign_list_index(rt: &mut Runtime, name: &str, index_text: &str, value_text: &str, idx: usize) -> Result<()> {
    let index: i64 = index_text.parse().unwrap_or(-1);
    let value = eval_line(rt, value_text)?;
    let Some(list_value) = rt.frames.get(name).cloned() else {
        report_line_error(rt, idx, &format!("{name} bir liste değil"));
        return Ok(());
    };
    let Some(list) = list_value.as_list() else {
        report_line_error(rt, idx, &format!("{name} bir liste değil"));
        return Ok(());
    };
    let mut list = list.borrow_mut();
    if index < 0 || index as usize >= list.len() {
        drop(list);
        report_line_error(rt, idx, &format!("Geçersiz indeks: {index}"));
    } else {
        list[index as usize] = value;
    }
    Ok(())
}

/// A minimal quote-aware scanner for `{"anahtar": değer, ...}` literals:
/// splits on top-level colons/commas while ignoring anything inside quotes.
/// Keys are taken as plain text (quotes stripped); values are compiled as
/// ordinary expressions, so `{"yaş": 5}` stores an Integer, not `"5"`.
fn parse_dict_literal(rt: &mut Runtime, pairs_str: &str) -> Result<Value> {
    let pairs_str = pairs_str.trim();
    let mut map = indexmap::IndexMap::new();
    if pairs_str.is_empty() {
        return Ok(Value::new_dict(map));
    }

    let mut buffer = String::new();
    let mut in_quotes = false;
    let mut quote_char = ' ';
    let mut current_key: Option<String> = None;
    let mut segments: Vec<String> = Vec::new();

    for ch in pairs_str.chars() {
        if (ch == '"' || ch == '\'') && !in_quotes {
            in_quotes = true;
            quote_char = ch;
            buffer.push(ch);
        } else if in_quotes && ch == quote_char {
            in_quotes = false;
            buffer.push(ch);
        } else if ch == ':' && !in_quotes && current_key.is_none() {
            current_key = Some(strip_quotes(buffer.trim()));
            buffer.clear();
        } else if ch == ',' && !in_quotes {
            segments.push(buffer.clone());
            buffer.clear();
            if let Some(key) = current_key.take() {
                let value = eval_line(rt, segments.last().unwrap().trim())?;
                map.insert(key, value);
            }
        } else {
            buffer.push(ch);
        }
    }
    if let Some(key) = current_key.take() {
        let value = eval_line(rt, buffer.trim())?;
        map.insert(key, value);
    }

    Ok(Value::new_dict(map))
}

fn strip_quotes(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if (bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"') || (bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\'') {
            return s[1..s.len() - 1].to_string();
        }
    }
    s.to_string()
}

/// Collects consecutive `... ise:` / `yoksa ... ise:` clauses and an
/// optional trailing `yoksa:`, executes the first clause whose condition is
/// true, and reports the index just past the whole chain's closing `bitir`.
fn exec_if_chain(rt: &mut Runtime, lines: &[String], start: usize) -> Result<(Signal, usize)> {
    struct Clause {
        is_else: bool,
        condition: Option<String>,
        body: Vec<String>,
    }

    let mut clauses = Vec::new();
    let mut ptr = start;
    while ptr < lines.len() {
        let trimmed = lines[ptr].trim();
        let Some(caps) = IF_CLAUSE_HEADER.captures(trimmed) else { break };
        let condition = caps[2].trim().to_string();
        let (body, after) = collect_block(lines, ptr + 1);
        ptr = after + 1;
        clauses.push(Clause { is_else: false, condition: Some(condition), body });
    }
    if ptr < lines.len() && lines[ptr].trim() == "yoksa:" {
        let (body, after) = collect_block(lines, ptr + 1);
        ptr = after + 1;
        clauses.push(Clause { is_else: true, condition: None, body });
    }

    let mut outcome = Signal::Normal;
    for clause in &clauses {
        let matches = if clause.is_else {
            true
        } else {
            eval_line(rt, clause.condition.as_ref().unwrap())?.is_truthy()
        };
        if matches {
            outcome = run_block(rt, &clause.body)?;
            break;
        }
    }

    Ok((outcome, ptr))
}

fn exec_while(rt: &mut Runtime, cond: &str, body: &[String]) -> Result<Signal> {
    while eval_line(rt, cond)?.is_truthy() {
        match run_block(rt, body)? {
            Signal::Continue | Signal::Normal => continue,
            Signal::Break => break,
            Signal::Return(value) => return Ok(Signal::Return(value)),
        }
    }
    Ok(Signal::Normal)
}

fn exec_for(rt: &mut Runtime, var: &str, lo: i64, hi: i64, body: &[String]) -> Result<Signal> {
    let mut i = lo;
    while i <= hi {
        rt.frames.set(var.to_string(), Value::Integer(i));
        match run_block(rt, body)? {
            Signal::Continue | Signal::Normal => {}
            Signal::Break => break,
            Signal::Return(value) => return Ok(Signal::Return(value)),
        }
        i += 1;
    }
    Ok(Signal::Normal)
}

fn clear_screen() {
    use crossterm::{cursor::MoveTo, terminal::{Clear, ClearType}, execute};
    let mut stdout = std::io::stdout();
    if execute!(stdout, Clear(ClearType::All), MoveTo(0, 0)).is_err() {
        println!("{}", "\n".repeat(80));
    }
}
