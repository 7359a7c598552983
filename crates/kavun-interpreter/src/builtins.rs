use crate::color::NamedColor;
use crate::draw;
use crate::runtime::Runtime;
use chrono::Local;
use indexmap::IndexMap;
use kavun_errors::{Result, RuntimeError};
use kavun_value::Value;
use once_cell::sync::Lazy;
use rand::Rng;
use std::collections::HashMap;
use std::fs;

type Builtin = fn(&mut Runtime, &[Value]) -> Result<Value>;

static REGISTRY: Lazy<HashMap<&'static str, Builtin>> = Lazy::new(|| {
    let mut m: HashMap<&'static str, Builtin> = HashMap::new();
    m.insert("rastgele", rastgele);
    m.insert("ondalık_rastgele", ondalik_rastgele);
    m.insert("karekök", karekok);
    m.insert("kuvvet", kuvvet);
    m.insert("mutlak", mutlak);
    m.insert("yuvarla", yuvarla);
    m.insert("sin", sin);
    m.insert("cos", cos);
    m.insert("tan", tan);
    m.insert("log", log);
    m.insert("log10", log10);
    m.insert("bekle", bekle);
    m.insert("şimdi", simdi);
    m.insert("tarih", tarih);
    m.insert("saat", saat);
    m.insert("liste_oluştur", liste_olustur);
    m.insert("liste_ekle", liste_ekle);
    m.insert("liste_uzunluk", liste_uzunluk);
    m.insert("liste_eleman", liste_eleman);
    m.insert("liste_sil", liste_sil);
    m.insert("metin_uzunluk", metin_uzunluk);
    m.insert("metin_kes", metin_kes);
    m.insert("metin_bul", metin_bul);
    m.insert("metin_degistir", metin_degistir);
    m.insert("büyük_harf", buyuk_harf);
    m.insert("küçük_harf", kucuk_harf);
    m.insert("dosya_oku", dosya_oku);
    m.insert("dosya_yaz", dosya_yaz);
    m.insert("dosya_ekle", dosya_ekle);
    m.insert("dosya_var_mi", dosya_var_mi);
    m.insert("dosya_sil", dosya_sil);
    m.insert("klasor_oluştur", klasor_olustur);
    m.insert("klasor_listesi", klasor_listesi);
    m.insert("kırmızı_yaz", kirmizi_yaz);
    m.insert("yesil_yaz", yesil_yaz);
    m.insert("sarı_yaz", sari_yaz);
    m.insert("mavi_yaz", mavi_yaz);
    m.insert("mor_yaz", mor_yaz);
    m.insert("turkuaz_yaz", turkuaz_yaz);
    m.insert("animasyonlu_yaz", animasyonlu_yaz);
    m.insert("animasyon_durdur", animasyon_durdur);
    m.insert("üçgen_çiz", ucgen_ciz);
    m.insert("kare_çiz", kare_ciz);
    m.insert("kalp_çiz", kalp_ciz);
    m.insert("grafik_çiz", grafik_ciz);
    m.insert("sözlük_oluştur", sozluk_olustur);
    m.insert("sözlük_eleman", sozluk_eleman);
    m.insert("sözlük_ekle", sozluk_ekle);
    m.insert("sözlük_sil", sozluk_sil);
    m.insert("sözlük_anahtarlar", sozluk_anahtarlar);
    m.insert("sözlük_değerler", sozluk_degerler);
    m.insert("sözlük_uzunluk", sozluk_uzunluk);
    m
});

pub fn call(rt: &mut Runtime, name: &str, args: &[Value]) -> Result<Value> {
    match REGISTRY.get(name) {
        Some(f) => f(rt, args),
        None => Err(RuntimeError::UndefinedFunction(name.to_string())),
    }
}

fn arg_error(name: &str, reason: impl Into<String>) -> RuntimeError {
    RuntimeError::BuiltinTypeError { builtin: name.to_string(), reason: reason.into() }
}

fn as_f64(name: &str, value: &Value) -> Result<f64> {
    value.as_f64().ok_or_else(|| arg_error(name, format!("{} bir sayı değil", value.type_name())))
}

fn as_i64(name: &str, value: &Value) -> Result<i64> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Float(f) => Ok(*f as i64),
        other => Err(arg_error(name, format!("{} bir tam sayı değil", other.type_name()))),
    }
}

fn as_str(value: &Value) -> String {
    value.to_string()
}

fn require_list<'a>(_name: &str, value: &'a Value) -> Result<&'a kavun_value::List> {
    value.as_list().ok_or_else(|| RuntimeError::NotAList(value.type_name().to_string()))
}

fn require_dict<'a>(_name: &str, value: &'a Value) -> Result<&'a kavun_value::Dict> {
    value.as_dict().ok_or_else(|| RuntimeError::NotADict(value.type_name().to_string()))
}

// --- Math / randomness ---

fn rastgele(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let lo = args.first().map(|v| as_i64("rastgele", v)).transpose()?.unwrap_or(1);
    let hi = args.get(1).map(|v| as_i64("rastgele", v)).transpose()?.unwrap_or(100);
    Ok(Value::Integer(rand::thread_rng().gen_range(lo..=hi)))
}

fn ondalik_rastgele(_rt: &mut Runtime, _args: &[Value]) -> Result<Value> {
    Ok(Value::Float(rand::thread_rng().gen::<f64>()))
}

fn karekok(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let x = as_f64("karekök", arg(args, 0, "karekök")?)?;
    Ok(Value::Float(x.sqrt()))
}

fn kuvvet(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let base = as_f64("kuvvet", arg(args, 0, "kuvvet")?)?;
    let exp = as_f64("kuvvet", arg(args, 1, "kuvvet")?)?;
    Ok(Value::Float(base.powf(exp)))
}

fn mutlak(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    match arg(args, 0, "mutlak")? {
        Value::Integer(i) => Ok(Value::Integer(i.abs())),
        other => Ok(Value::Float(as_f64("mutlak", other)?.abs())),
    }
}

fn yuvarla(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let x = as_f64("yuvarla", arg(args, 0, "yuvarla")?)?;
    let digits = args.get(1).map(|v| as_i64("yuvarla", v)).transpose()?.unwrap_or(0);
    let factor = 10f64.powi(digits as i32);
    let rounded = (x * factor).round() / factor;
    if digits <= 0 {
        Ok(Value::Integer(rounded as i64))
    } else {
        Ok(Value::Float(rounded))
    }
}

fn sin(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    Ok(Value::Float(as_f64("sin", arg(args, 0, "sin")?)?.sin()))
}

fn cos(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    Ok(Value::Float(as_f64("cos", arg(args, 0, "cos")?)?.cos()))
}

fn tan(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    Ok(Value::Float(as_f64("tan", arg(args, 0, "tan")?)?.tan()))
}

fn log(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    Ok(Value::Float(as_f64("log", arg(args, 0, "log")?)?.ln()))
}

fn log10(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    Ok(Value::Float(as_f64("log10", arg(args, 0, "log10")?)?.log10()))
}

fn bekle(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let seconds = as_f64("bekle", arg(args, 0, "bekle")?)?;
    std::thread::sleep(std::time::Duration::from_secs_f64(seconds.max(0.0)));
    Ok(Value::Nil)
}

fn simdi(_rt: &mut Runtime, _args: &[Value]) -> Result<Value> {
    Ok(Value::String(Local::now().format("%Y-%m-%d %H:%M:%S").to_string()))
}

fn tarih(_rt: &mut Runtime, _args: &[Value]) -> Result<Value> {
    Ok(Value::String(Local::now().format("%d/%m/%Y").to_string()))
}

fn saat(_rt: &mut Runtime, _args: &[Value]) -> Result<Value> {
    Ok(Value::String(Local::now().format("%H:%M:%S").to_string()))
}

fn arg<'a>(args: &'a [Value], index: usize, name: &str) -> Result<&'a Value> {
    args.get(index).ok_or_else(|| arg_error(name, format!("{} parametre bekleniyor", index + 1)))
}

// --- Lists ---

fn liste_olustur(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    Ok(Value::new_list(args.to_vec()))
}

fn liste_ekle(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let list = require_list("liste_ekle", arg(args, 0, "liste_ekle")?)?;
    let element = arg(args, 1, "liste_ekle")?.clone();
    list.borrow_mut().push(element);
    Ok(arg(args, 0, "liste_ekle")?.clone())
}

fn liste_uzunluk(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let list = require_list("liste_uzunluk", arg(args, 0, "liste_uzunluk")?)?;
    Ok(Value::Integer(list.borrow().len() as i64))
}

fn liste_eleman(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let list = require_list("liste_eleman", arg(args, 0, "liste_eleman")?)?;
    let index = as_i64("liste_eleman", arg(args, 1, "liste_eleman")?)?;
    let list = list.borrow();
    if index < 0 || index as usize >= list.len() {
        return Err(RuntimeError::InvalidIndex(index));
    }
    Ok(list[index as usize].clone())
}

fn liste_sil(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let list = require_list("liste_sil", arg(args, 0, "liste_sil")?)?;
    let index = as_i64("liste_sil", arg(args, 1, "liste_sil")?)?;
    let mut list = list.borrow_mut();
    if index < 0 || index as usize >= list.len() {
        return Err(RuntimeError::InvalidIndex(index));
    }
    Ok(list.remove(index as usize))
}

// --- Strings ---

fn metin_uzunluk(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    Ok(Value::Integer(as_str(arg(args, 0, "metin_uzunluk")?).chars().count() as i64))
}

fn metin_kes(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let text: Vec<char> = as_str(arg(args, 0, "metin_kes")?).chars().collect();
    let start = as_i64("metin_kes", arg(args, 1, "metin_kes")?)?.clamp(0, text.len() as i64) as usize;
    let end = match args.get(2) {
        Some(v) => as_i64("metin_kes", v)?.clamp(0, text.len() as i64) as usize,
        None => text.len(),
    };
    let end = end.max(start);
    Ok(Value::String(text[start..end].iter().collect()))
}

fn metin_bul(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let text = as_str(arg(args, 0, "metin_bul")?);
    let needle = as_str(arg(args, 1, "metin_bul")?);
    match text.find(&needle) {
        Some(byte_index) => Ok(Value::Integer(text[..byte_index].chars().count() as i64)),
        None => Ok(Value::Integer(-1)),
    }
}

fn metin_degistir(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let text = as_str(arg(args, 0, "metin_degistir")?);
    let old = as_str(arg(args, 1, "metin_degistir")?);
    let new = as_str(arg(args, 2, "metin_degistir")?);
    Ok(Value::String(text.replace(&old, &new)))
}

fn buyuk_harf(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    Ok(Value::String(as_str(arg(args, 0, "büyük_harf")?).to_uppercase()))
}

fn kucuk_harf(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    Ok(Value::String(as_str(arg(args, 0, "küçük_harf")?).to_lowercase()))
}

// --- Filesystem ---

fn dosya_oku(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let path = as_str(arg(args, 0, "dosya_oku")?);
    fs::read_to_string(&path)
        .map(Value::String)
        .map_err(|e| RuntimeError::io(format!("Dosya okuma hatası: {path}"), e))
}

fn dosya_yaz(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let path = as_str(arg(args, 0, "dosya_yaz")?);
    let content = as_str(arg(args, 1, "dosya_yaz")?);
    fs::write(&path, content)
        .map(|_| Value::Boolean(true))
        .map_err(|e| RuntimeError::io(format!("Dosya yazma hatası: {path}"), e))
}

fn dosya_ekle(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    use std::io::Write as _;
    let path = as_str(arg(args, 0, "dosya_ekle")?);
    let content = as_str(arg(args, 1, "dosya_ekle")?);
    let result = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .and_then(|mut f| f.write_all(content.as_bytes()));
    result.map(|_| Value::Boolean(true)).map_err(|e| RuntimeError::io(format!("Dosya ekleme hatası: {path}"), e))
}

fn dosya_var_mi(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let path = as_str(arg(args, 0, "dosya_var_mi")?);
    Ok(Value::Boolean(std::path::Path::new(&path).exists()))
}

fn dosya_sil(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let path = as_str(arg(args, 0, "dosya_sil")?);
    match fs::remove_file(&path) {
        Ok(()) => Ok(Value::Boolean(true)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Value::Boolean(false)),
        Err(e) => Err(RuntimeError::io(format!("Dosya silme hatası: {path}"), e)),
    }
}

fn klasor_olustur(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let path = as_str(arg(args, 0, "klasor_oluştur")?);
    fs::create_dir_all(&path)
        .map(|_| Value::Boolean(true))
        .map_err(|e| RuntimeError::io(format!("Klasör oluşturma hatası: {path}"), e))
}

fn klasor_listesi(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let path = args.first().map(as_str).unwrap_or_else(|| ".".to_string());
    let mut names = Vec::new();
    let entries = fs::read_dir(&path).map_err(|e| RuntimeError::io(format!("Klasör listesi alma hatası: {path}"), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| RuntimeError::io(format!("Klasör listesi alma hatası: {path}"), e))?;
        names.push(Value::String(entry.file_name().to_string_lossy().into_owned()));
    }
    Ok(Value::new_list(names))
}

// --- Colored / animated / drawn output ---

fn print_colored(rt: &mut Runtime, color: NamedColor, args: &[Value], name: &str) -> Result<Value> {
    let text = as_str(arg(args, 0, name)?);
    let painted = color.paint(&text);
    rt.println(&painted);
    Ok(Value::Nil)
}

fn kirmizi_yaz(rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    print_colored(rt, NamedColor::Red, args, "kırmızı_yaz")
}
fn yesil_yaz(rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    print_colored(rt, NamedColor::Green, args, "yesil_yaz")
}
fn sari_yaz(rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    print_colored(rt, NamedColor::Yellow, args, "sarı_yaz")
}
fn mavi_yaz(rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    print_colored(rt, NamedColor::Blue, args, "mavi_yaz")
}
fn mor_yaz(rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    print_colored(rt, NamedColor::Magenta, args, "mor_yaz")
}
fn turkuaz_yaz(rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    print_colored(rt, NamedColor::Turquoise, args, "turkuaz_yaz")
}

fn animasyonlu_yaz(rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let text = as_str(arg(args, 0, "animasyonlu_yaz")?);
    rt.animation.start(text);
    Ok(Value::Nil)
}

fn animasyon_durdur(rt: &mut Runtime, _args: &[Value]) -> Result<Value> {
    rt.animation.stop();
    Ok(Value::Nil)
}

fn ucgen_ciz(rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let size = as_i64("üçgen_çiz", arg(args, 0, "üçgen_çiz")?)?.max(0) as usize;
    for line in draw::triangle(size) {
        rt.println(&line);
    }
    Ok(Value::Nil)
}

fn kare_ciz(rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let size = as_i64("kare_çiz", arg(args, 0, "kare_çiz")?)?.max(0) as usize;
    for line in draw::square(size) {
        rt.println(&line);
    }
    Ok(Value::Nil)
}

fn kalp_ciz(rt: &mut Runtime, _args: &[Value]) -> Result<Value> {
    for line in draw::heart() {
        rt.println(&NamedColor::Red.paint(&line));
    }
    Ok(Value::Nil)
}

fn grafik_ciz(rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let list = require_list("grafik_çiz", arg(args, 0, "grafik_çiz")?)?;
    let values: Vec<f64> = list
        .borrow()
        .iter()
        .map(|v| v.as_f64().ok_or_else(|| arg_error("grafik_çiz", "veriler sayısal olmalı")))
        .collect::<Result<Vec<_>>>()?;
    for line in draw::bar_chart(&values) {
        rt.println(&line);
    }
    Ok(Value::Nil)
}

// --- Dictionaries ---

fn dict_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn sozluk_olustur(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    if args.len() % 2 != 0 {
        return Err(arg_error("sözlük_oluştur", "anahtar-değer çiftleri gerekli"));
    }
    let mut map = IndexMap::new();
    for pair in args.chunks(2) {
        map.insert(dict_key(&pair[0]), pair[1].clone());
    }
    Ok(Value::new_dict(map))
}

fn sozluk_eleman(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let dict = require_dict("sözlük_eleman", arg(args, 0, "sözlük_eleman")?)?;
    let key = dict_key(arg(args, 1, "sözlük_eleman")?);
    Ok(dict.borrow().get(&key).cloned().unwrap_or(Value::Nil))
}

fn sozluk_ekle(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let dict = require_dict("sözlük_ekle", arg(args, 0, "sözlük_ekle")?)?;
    let key = dict_key(arg(args, 1, "sözlük_ekle")?);
    let value = arg(args, 2, "sözlük_ekle")?.clone();
    dict.borrow_mut().insert(key, value);
    Ok(arg(args, 0, "sözlük_ekle")?.clone())
}

fn sozluk_sil(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let dict = require_dict("sözlük_sil", arg(args, 0, "sözlük_sil")?)?;
    let key = dict_key(arg(args, 1, "sözlük_sil")?);
    Ok(dict.borrow_mut().shift_remove(&key).unwrap_or(Value::Nil))
}

fn sozluk_anahtarlar(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let dict = require_dict("sözlük_anahtarlar", arg(args, 0, "sözlük_anahtarlar")?)?;
    let keys = dict.borrow().keys().cloned().map(Value::String).collect();
    Ok(Value::new_list(keys))
}

fn sozluk_degerler(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let dict = require_dict("sözlük_değerler", arg(args, 0, "sözlük_değerler")?)?;
    let values = dict.borrow().values().cloned().collect();
    Ok(Value::new_list(values))
}

fn sozluk_uzunluk(_rt: &mut Runtime, args: &[Value]) -> Result<Value> {
    let dict = require_dict("sözlük_uzunluk", arg(args, 0, "sözlük_uzunluk")?)?;
    Ok(Value::Integer(dict.borrow().len() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::sink;

    fn rt() -> Runtime {
        Runtime::new(Box::new(sink()))
    }

    #[test]
    fn liste_ekle_mutates_in_place() {
        let mut runtime = rt();
        let list = Value::new_list(vec![Value::Integer(1)]);
        let result = liste_ekle(&mut runtime, &[list.clone(), Value::Integer(2)]).unwrap();
        assert_eq!(result.to_string(), "[1, 2]");
        assert_eq!(list.to_string(), "[1, 2]");
    }

    #[test]
    fn metin_kes_slices_by_character() {
        let mut runtime = rt();
        let result = metin_kes(&mut runtime, &[Value::String("merhaba".into()), Value::Integer(2), Value::Integer(5)]).unwrap();
        assert_eq!(result, Value::String("rha".into()));
    }

    #[test]
    fn sozluk_roundtrip() {
        let mut runtime = rt();
        let dict = sozluk_olustur(&mut runtime, &[Value::String("ad".into()), Value::String("Ada".into())]).unwrap();
        let value = sozluk_eleman(&mut runtime, &[dict, Value::String("ad".into())]).unwrap();
        assert_eq!(value, Value::String("Ada".into()));
    }

    #[test]
    fn unknown_builtin_is_reported() {
        let mut runtime = rt();
        let err = call(&mut runtime, "bilinmeyen_işlev", &[]).unwrap_err();
        assert!(matches!(err, RuntimeError::UndefinedFunction(_)));
    }
}
